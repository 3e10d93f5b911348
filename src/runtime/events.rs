//! Runtime event stream payloads.

use std::path::PathBuf;

use crate::{protocol::selection::Selection, types::StoreVersion};

/// Events broadcast by the single-writer loop. Subscribers re-read a full
/// snapshot on `PicksChanged` or `SelectionChanged`.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
    /// The pick store was mutated.
    PicksChanged {
        /// Store version after the mutation.
        version: StoreVersion,
    },
    /// Active well, top or curve changed.
    SelectionChanged {
        /// New selection.
        selection: Selection,
    },
    /// A save request finished writing.
    Saved {
        /// Destination written.
        path: PathBuf,
        /// Store version that was written.
        version: StoreVersion,
        /// Number of rows written.
        rows: usize,
    },
    /// A save request could not be written; the store is unaffected.
    SaveFailed {
        /// Destination attempted.
        path: PathBuf,
        /// Failure description.
        message: String,
    },
}
