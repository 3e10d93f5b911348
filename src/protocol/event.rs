//! UI boundary events.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{CurveName, Depth, TopName, Uwi};

/// Events constructed explicitly by the UI layer.
///
/// Serialized with an `event` tag so scripts can be replayed from JSON lines,
/// e.g. `{"event":"plot_clicked","depth":2500.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditEvent {
    /// The log plot was clicked at a depth.
    PlotClicked {
        /// Depth under the cursor.
        depth: Depth,
    },
    /// A new top name was submitted.
    NewTopRequested {
        /// Requested top name.
        name: TopName,
    },
    /// The well selector changed.
    WellSelected {
        /// Selected well.
        uwi: Uwi,
    },
    /// The curve selector changed.
    CurveSelected {
        /// Selected curve.
        name: CurveName,
    },
    /// The top selector changed; `None` clears it.
    TopSelected {
        /// Selected top, if any.
        #[serde(default)]
        name: Option<TopName>,
    },
    /// Picks should be written to `path`.
    SaveRequested {
        /// Destination, relative to the save directory unless absolute.
        path: PathBuf,
    },
}

impl EditEvent {
    /// Short name used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlotClicked { .. } => "plot_clicked",
            Self::NewTopRequested { .. } => "new_top_requested",
            Self::WellSelected { .. } => "well_selected",
            Self::CurveSelected { .. } => "curve_selected",
            Self::TopSelected { .. } => "top_selected",
            Self::SaveRequested { .. } => "save_requested",
        }
    }
}
