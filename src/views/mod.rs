//! Pure projections of the well store and a pick snapshot.

/// Multi-well cross-section.
pub mod cross_section;
/// Top-name styling source.
pub mod legend;
/// Single-well log view.
pub mod log_view;
/// Renderable primitives.
pub mod scene;
/// Tabular listing.
pub mod table;

use std::io::{self, BufWriter, Write};

use serde::{Deserialize, Serialize};

use crate::{
    pick::PickRow,
    protocol::editor::SessionSnapshot,
    types::{Depth, StoreVersion},
    well::WellSet,
};

use self::{
    cross_section::{CrossSection, SectionConfig, render_cross_section},
    legend::LegendSource,
    log_view::{LogView, LogViewConfig, render_log_view},
    scene::DepthAxis,
    table::render_table,
};

/// Depth interval shown by the cross-section, and tick spacing for all views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthWindow {
    /// Shallowest depth.
    pub top: Depth,
    /// Deepest depth.
    pub base: Depth,
    /// Labelled tick spacing.
    pub major: f64,
    /// Unlabelled tick spacing.
    pub minor: f64,
}

impl Default for DepthWindow {
    fn default() -> Self {
        Self {
            top: 3000.0,
            base: 5500.0,
            major: 100.0,
            minor: 25.0,
        }
    }
}

impl DepthWindow {
    /// Axis spanning the window.
    pub fn axis(&self) -> DepthAxis {
        DepthAxis {
            top: self.top.min(self.base),
            base: self.top.max(self.base),
            major: self.major,
            minor: self.minor,
        }
    }
}

/// Settings for every projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Cross-section window and tick spacing.
    pub window: DepthWindow,
    /// Log view layout.
    pub log: LogViewConfig,
    /// Cross-section layout.
    pub section: SectionConfig,
}

/// All three views derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Views {
    /// Store version the views were rendered from.
    pub version: StoreVersion,
    /// Log view of the active well; `None` if it is not loaded.
    pub log: Option<LogView>,
    /// Cross-section of all wells.
    pub section: CrossSection,
    /// Pick table.
    pub table: Vec<PickRow>,
}

impl Views {
    /// Writes the views as pretty JSON. The buffer is flushed before
    /// returning so a late write error is reported.
    pub fn write_json<W: Write>(&self, out: W) -> io::Result<()> {
        let mut writer = BufWriter::new(out);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()
    }
}

/// Recomputes every view from `snapshot`. The projections only read, so they
/// run in parallel over the same snapshot.
pub fn render_all(
    wells: &WellSet,
    snapshot: &SessionSnapshot,
    legend: &dyn LegendSource,
    cfg: &ViewConfig,
) -> Views {
    let selection = &snapshot.selection;
    let store = &snapshot.store;

    let (log, (section, table)) = rayon::join(
        || {
            wells.get(&selection.active_well).map(|well| {
                render_log_view(
                    well,
                    store.for_well(&selection.active_well),
                    selection.active_curve.as_deref(),
                    legend,
                    &cfg.window,
                    &cfg.log,
                )
            })
        },
        || {
            rayon::join(
                || render_cross_section(wells, store, legend, &cfg.window, &cfg.section),
                || render_table(store),
            )
        },
    );

    Views {
        version: store.version,
        log,
        section,
        table,
    }
}
