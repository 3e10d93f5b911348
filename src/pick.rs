//! Pick records and the `[UWI, PICK, MD]` row contract.

use serde::{Deserialize, Serialize};

use crate::types::{Depth, TopName, Uwi};

/// Uniqueness key of a pick: one depth per well and top name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickKey {
    /// Well identifier.
    pub uwi: Uwi,
    /// Top name.
    pub top_name: TopName,
}

impl PickKey {
    /// Builds a key from its parts.
    pub fn new(uwi: impl Into<Uwi>, top_name: impl Into<TopName>) -> Self {
        Self {
            uwi: uwi.into(),
            top_name: top_name.into(),
        }
    }
}

/// A single correlation mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    /// Well identifier.
    pub uwi: Uwi,
    /// Top name.
    pub top_name: TopName,
    /// Measured depth; `None` for a top declared but not yet placed.
    pub md: Option<Depth>,
}

impl Pick {
    /// True when the pick has a depth and can be drawn.
    pub fn is_placed(&self) -> bool {
        self.md.is_some()
    }

    /// Uniqueness key of this pick.
    pub fn key(&self) -> PickKey {
        PickKey::new(self.uwi.clone(), self.top_name.clone())
    }
}

/// One persisted row. Field names are the on-disk column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickRow {
    /// Well identifier column.
    #[serde(rename = "UWI")]
    pub uwi: Uwi,
    /// Top name column.
    #[serde(rename = "PICK", alias = "top_name")]
    pub pick: TopName,
    /// Measured depth column; `null` when undefined.
    #[serde(rename = "MD")]
    pub md: Option<Depth>,
}

/// Column header of the tabular pick format, in order.
pub const PICK_COLUMNS: [&str; 3] = ["UWI", "PICK", "MD"];

impl From<Pick> for PickRow {
    fn from(value: Pick) -> Self {
        Self {
            uwi: value.uwi,
            pick: value.top_name,
            md: value.md,
        }
    }
}

impl From<PickRow> for Pick {
    fn from(value: PickRow) -> Self {
        Self {
            uwi: value.uwi,
            top_name: value.pick,
            md: value.md,
        }
    }
}
