use std::{cmp::Ordering, collections::BTreeSet, fmt::Write as _};

use hashbrown::HashMap;
use tracing::debug;

use crate::{
    core::indices::WellIndex,
    pick::{Pick, PickKey, PickRow},
    types::{Depth, StoreVersion, TopName, Uwi},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("empty well identifier for top {top_name:?}")]
    EmptyUwi { top_name: TopName },
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<StoreError>,
    },
}

/// Result of a single upsert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Upserted {
    Inserted { version: StoreVersion },
    Replaced {
        version: StoreVersion,
        previous: Option<Depth>,
    },
}

impl Upserted {
    pub fn version(&self) -> StoreVersion {
        match self {
            Self::Inserted { version } | Self::Replaced { version, .. } => *version,
        }
    }
}

/// Consistent, immutable copy of the store taken between mutations.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub version: StoreVersion,
    /// All picks in display order.
    pub picks: Vec<Pick>,
}

impl StoreSnapshot {
    pub fn for_well<'a>(&'a self, uwi: &'a Uwi) -> impl Iterator<Item = &'a Pick> + 'a {
        self.picks.iter().filter(move |p| &p.uwi == uwi)
    }

    pub fn top_names(&self) -> BTreeSet<TopName> {
        self.picks.iter().map(|p| p.top_name.clone()).collect()
    }

    pub fn to_rows(&self) -> Vec<PickRow> {
        self.picks.iter().cloned().map(PickRow::from).collect()
    }
}

#[derive(Debug, Default, Clone)]
pub struct PickStore {
    picks: HashMap<PickKey, Option<Depth>>,
    by_well: WellIndex,
    version: StoreVersion,
}

impl PickStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from persisted rows; a later row for the same
    /// `(UWI, PICK)` wins.
    pub fn from_rows(rows: impl IntoIterator<Item = PickRow>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for (row, pick) in rows.into_iter().enumerate() {
            store
                .upsert(pick.uwi, pick.pick, pick.md)
                .map_err(|e| StoreError::Row {
                    row,
                    source: Box::new(e),
                })?;
        }
        Ok(store)
    }

    /// Rows for every pick, in display order.
    pub fn to_rows(&self) -> Vec<PickRow> {
        self.all().into_iter().map(PickRow::from).collect()
    }

    /// Inserts or replaces the pick for `(uwi, top_name)`.
    ///
    /// Non-finite depths are stored as undefined. Depths outside the logged
    /// interval and empty or untrimmed top names are stored as given; guarding
    /// them is the caller's concern. An empty well identifier is rejected, as
    /// such a pick could never be loaded back.
    pub fn upsert(
        &mut self,
        uwi: impl Into<Uwi>,
        top_name: impl Into<TopName>,
        md: Option<Depth>,
    ) -> Result<Upserted, StoreError> {
        let key = PickKey::new(uwi, top_name);
        if key.uwi.is_empty() {
            return Err(StoreError::EmptyUwi {
                top_name: key.top_name,
            });
        }
        let md = md.filter(|d| d.is_finite());
        self.version += 1;
        let version = self.version;

        self.by_well
            .entry(key.uwi.clone())
            .or_default()
            .insert(key.top_name.clone());

        debug!(uwi = %key.uwi, top = %key.top_name, md = ?md, version, "pick upserted");
        Ok(match self.picks.insert(key, md) {
            None => Upserted::Inserted { version },
            Some(previous) => Upserted::Replaced { version, previous },
        })
    }

    pub fn get(&self, uwi: &Uwi, top_name: &str) -> Option<Pick> {
        let key = PickKey::new(uwi.clone(), top_name);
        self.picks.get(&key).map(|md| Pick {
            uwi: key.uwi,
            top_name: key.top_name,
            md: *md,
        })
    }

    /// Every pick, sorted by UWI then depth (undefined last) then top name.
    pub fn all(&self) -> Vec<Pick> {
        let mut out: Vec<Pick> = self
            .picks
            .iter()
            .map(|(k, md)| Pick {
                uwi: k.uwi.clone(),
                top_name: k.top_name.clone(),
                md: *md,
            })
            .collect();
        out.sort_by(display_order);
        out
    }

    /// Picks of one well in depth order, undefined depths included.
    pub fn for_well(&self, uwi: &Uwi) -> Vec<Pick> {
        let mut out: Vec<Pick> = self
            .by_well
            .get(uwi)
            .into_iter()
            .flat_map(|tops| tops.iter())
            .filter_map(|top| self.get(uwi, top))
            .collect();
        out.sort_by(display_order);
        out
    }

    /// Distinct top names across all wells.
    pub fn top_names(&self) -> BTreeSet<TopName> {
        self.by_well
            .values()
            .flat_map(|tops| tops.iter().cloned())
            .collect()
    }

    pub fn has_top(&self, top_name: &str) -> bool {
        self.by_well.values().any(|tops| tops.contains(top_name))
    }

    pub fn len(&self) -> usize {
        self.picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn version(&self) -> StoreVersion {
        self.version
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            version: self.version,
            picks: self.all(),
        }
    }

    /// `Comp Formation, Depth` text of the placed picks of one well.
    pub fn striplog_csv(&self, uwi: &Uwi) -> String {
        let mut out = String::from("Comp Formation,Depth\n");
        for pick in self.for_well(uwi) {
            if let Some(md) = pick.md {
                let _ = writeln!(out, "{},{}", pick.top_name, md);
            }
        }
        out
    }
}

/// Sort order shared by the table and every listing.
pub fn display_order(a: &Pick, b: &Pick) -> Ordering {
    a.uwi
        .cmp(&b.uwi)
        .then_with(|| match (a.md, b.md) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.top_name.cmp(&b.top_name))
}
