use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, info, warn};

use crate::{
    core::store::{PickStore, StoreError, StoreSnapshot},
    pick::PickRow,
    types::{CurveName, Depth, StoreVersion, TopName, Uwi},
    well::WellSet,
};

use super::{event::EditEvent, selection::Selection};

/// Input errors; the event is rejected and no state changes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("unknown well {0}")]
    UnknownWell(Uwi),
    #[error("well {uwi} has no curve {curve}")]
    UnknownCurve { uwi: Uwi, curve: CurveName },
    #[error("unknown top {0}")]
    UnknownTop(TopName),
    #[error("top name is empty")]
    EmptyTopName,
    #[error("depth {0} is not a finite number")]
    InvalidDepth(Depth),
    #[error("save path is empty")]
    EmptyPath,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Pending write produced by a save request.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveJob {
    pub path: PathBuf,
    pub rows: Vec<PickRow>,
    pub version: StoreVersion,
}

/// What an accepted event did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    PickPlaced {
        uwi: Uwi,
        top_name: TopName,
        md: Depth,
        version: StoreVersion,
    },
    /// Plot click without an active top.
    ClickIgnored,
    TopCreated {
        uwi: Uwi,
        top_name: TopName,
        version: StoreVersion,
    },
    /// The name was already registered; it becomes the active top and the
    /// store is unchanged.
    TopExists { top_name: TopName },
    WellChanged {
        uwi: Uwi,
        /// Sorted curve names carried by the new well.
        curves: Vec<CurveName>,
        active_curve: Option<CurveName>,
    },
    CurveChanged { name: CurveName },
    TopChanged { name: Option<TopName> },
    SaveQueued(SaveJob),
}

impl Outcome {
    /// True when the pick store was mutated.
    pub fn mutated_store(&self) -> bool {
        matches!(self, Self::PickPlaced { .. } | Self::TopCreated { .. })
    }
}

/// Store plus selection, read together by the views.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub store: StoreSnapshot,
    pub selection: Selection,
}

/// Single writer of the pick store.
///
/// Every mutation goes through [`PickEditor::apply`]; a rejected event leaves
/// both the store and the selection untouched.
#[derive(Debug, Clone)]
pub struct PickEditor {
    wells: Arc<WellSet>,
    store: PickStore,
    selection: Selection,
    save_dir: PathBuf,
}

impl PickEditor {
    pub fn new(wells: Arc<WellSet>, store: PickStore) -> Self {
        let selection = Selection::initial(&wells);
        info!(
            well = %selection.active_well,
            curve = ?selection.active_curve,
            picks = store.len(),
            "pick editor ready"
        );
        Self {
            wells,
            store,
            selection,
            save_dir: PathBuf::new(),
        }
    }

    /// Relative save paths are resolved under `dir`.
    pub fn with_save_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.save_dir = dir.into();
        self
    }

    pub fn wells(&self) -> &Arc<WellSet> {
        &self.wells
    }

    pub fn store(&self) -> &PickStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Curve names of the active well.
    pub fn active_curves(&self) -> Vec<CurveName> {
        self.wells
            .get(&self.selection.active_well)
            .map(|w| w.curve_names())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            store: self.store.snapshot(),
            selection: self.selection.clone(),
        }
    }

    pub fn apply(&mut self, event: EditEvent) -> Result<Outcome, EditError> {
        let kind = event.kind();
        let res = match event {
            EditEvent::PlotClicked { depth } => self.plot_clicked(depth),
            EditEvent::NewTopRequested { name } => self.new_top(name),
            EditEvent::WellSelected { uwi } => self.select_well(uwi),
            EditEvent::CurveSelected { name } => self.select_curve(name),
            EditEvent::TopSelected { name } => self.select_top(name),
            EditEvent::SaveRequested { path } => self.save(&path),
        };
        match &res {
            Ok(outcome) => debug!(event = kind, ?outcome, "event applied"),
            Err(err) => warn!(event = kind, error = %err, "event rejected"),
        }
        res
    }

    fn plot_clicked(&mut self, depth: Depth) -> Result<Outcome, EditError> {
        if !depth.is_finite() {
            return Err(EditError::InvalidDepth(depth));
        }
        let Some(top) = self.selection.active_top.clone() else {
            return Ok(Outcome::ClickIgnored);
        };
        let uwi = self.selection.active_well.clone();
        let version = self.store.upsert(uwi.clone(), top.clone(), Some(depth))?.version();
        Ok(Outcome::PickPlaced {
            uwi,
            top_name: top,
            md: depth,
            version,
        })
    }

    fn new_top(&mut self, name: TopName) -> Result<Outcome, EditError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(EditError::EmptyTopName);
        }
        if self.store.has_top(&name) {
            self.selection.active_top = Some(name.clone());
            return Ok(Outcome::TopExists { top_name: name });
        }
        let uwi = self.selection.active_well.clone();
        let version = self.store.upsert(uwi.clone(), name.clone(), None)?.version();
        self.selection.active_top = Some(name.clone());
        info!(well = %uwi, top = %name, "top created");
        Ok(Outcome::TopCreated {
            uwi,
            top_name: name,
            version,
        })
    }

    fn select_well(&mut self, uwi: Uwi) -> Result<Outcome, EditError> {
        let well = self
            .wells
            .get(&uwi)
            .ok_or_else(|| EditError::UnknownWell(uwi.clone()))?;
        let curves = well.curve_names();
        let active_curve = well.default_curve().map(str::to_string);

        self.selection.active_well = uwi.clone();
        self.selection.active_curve = active_curve.clone();
        Ok(Outcome::WellChanged {
            uwi,
            curves,
            active_curve,
        })
    }

    fn select_curve(&mut self, name: CurveName) -> Result<Outcome, EditError> {
        let uwi = &self.selection.active_well;
        let known = self.wells.get(uwi).is_some_and(|w| w.has_curve(&name));
        if !known {
            return Err(EditError::UnknownCurve {
                uwi: uwi.clone(),
                curve: name,
            });
        }
        self.selection.active_curve = Some(name.clone());
        Ok(Outcome::CurveChanged { name })
    }

    fn select_top(&mut self, name: Option<TopName>) -> Result<Outcome, EditError> {
        if let Some(top) = &name {
            if !self.store.has_top(top) {
                return Err(EditError::UnknownTop(top.clone()));
            }
        }
        self.selection.active_top = name.clone();
        Ok(Outcome::TopChanged { name })
    }

    fn save(&self, path: &Path) -> Result<Outcome, EditError> {
        if path.as_os_str().is_empty() {
            return Err(EditError::EmptyPath);
        }
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.save_dir.join(path)
        };
        Ok(Outcome::SaveQueued(SaveJob {
            path,
            rows: self.store.to_rows(),
            version: self.store.version(),
        }))
    }
}
