//! Pick-edit protocol: the only mutation path into the pick store.

/// Session state machine applying events to the store.
pub mod editor;
/// UI events accepted by the editor.
pub mod event;
/// Transient selection state.
pub mod selection;
