//! Transient selection state, never persisted.

use serde::{Deserialize, Serialize};

use crate::{
    types::{CurveName, TopName, Uwi},
    well::WellSet,
};

/// Active well, top and curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Well receiving picks and shown in the log view.
    pub active_well: Uwi,
    /// Top placed by plot clicks; clicks are ignored while `None`.
    pub active_top: Option<TopName>,
    /// Curve drawn in the first log-view track.
    pub active_curve: Option<CurveName>,
}

impl Selection {
    /// First well, no top, and that well's default curve.
    pub fn initial(wells: &WellSet) -> Self {
        let well = wells.first();
        Self {
            active_well: well.uwi().clone(),
            active_top: None,
            active_curve: well.default_curve().map(str::to_string),
        }
    }
}
