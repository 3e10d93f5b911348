//! Multi-well cross-section: one column per well on a shared depth window.

use serde::{Deserialize, Serialize};

use crate::{
    core::store::StoreSnapshot,
    types::{CurveName, Uwi},
    well::{Well, WellSet},
};

use super::{
    DepthWindow,
    legend::LegendSource,
    scene::{AxisScale, Color, DepthAxis, PickMarker, Trace},
};

/// Cross-section layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Curve drawn in every column.
    pub curve: CurveName,
    /// Horizontal scale of that curve.
    pub scale: AxisScale,
    /// Trace color.
    pub trace_color: Color,
    /// Trace width in points.
    pub trace_width: f32,
    /// Explicit column order; `None` keeps load order.
    pub well_order: Option<Vec<Uwi>>,
    /// Titles longer than this are rotated to vertical.
    pub max_title_len: usize,
    /// Horizontal label anchor inside each column.
    pub label_x: f64,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            curve: "GR".to_string(),
            scale: AxisScale::Linear { min: 0.0, max: 175.0 },
            trace_color: Color::BLACK,
            trace_width: 0.5,
            well_order: None,
            max_title_len: 10,
            label_x: 0.1,
        }
    }
}

/// One well column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Well shown.
    pub uwi: Uwi,
    /// Column title.
    pub title: String,
    /// Title rotation in degrees.
    pub title_rotation: f32,
    /// Only the leftmost column carries depth tick labels.
    pub show_depth_labels: bool,
    /// Curve trace clipped to the depth window; empty when missing.
    pub trace: Trace,
    /// Placed picks strictly inside the window.
    pub markers: Vec<PickMarker>,
}

/// Rendered cross-section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    /// Shared depth axis.
    pub depth_axis: DepthAxis,
    /// Horizontal scale shared by every column.
    pub scale: AxisScale,
    /// Columns from left to right.
    pub columns: Vec<Column>,
}

/// Renders every well with its picks from `picks`.
pub fn render_cross_section(
    wells: &WellSet,
    picks: &StoreSnapshot,
    legend: &dyn LegendSource,
    window: &DepthWindow,
    cfg: &SectionConfig,
) -> CrossSection {
    let ordered: Vec<&Well> = match &cfg.well_order {
        Some(order) => order
            .iter()
            .filter_map(|uwi| wells.get(uwi).map(|w| w.as_ref()))
            .collect(),
        None => wells.iter().map(|w| w.as_ref()).collect(),
    };

    let depth_axis = window.axis();
    let columns = ordered
        .into_iter()
        .enumerate()
        .map(|(i, well)| build_column(well, i == 0, picks, legend, &depth_axis, cfg))
        .collect();

    CrossSection {
        depth_axis,
        scale: cfg.scale,
        columns,
    }
}

fn build_column(
    well: &Well,
    leftmost: bool,
    picks: &StoreSnapshot,
    legend: &dyn LegendSource,
    axis: &DepthAxis,
    cfg: &SectionConfig,
) -> Column {
    let curve = well.curve(&cfg.curve);
    let points = curve
        .map(|c| c.samples().filter(|(_, d)| axis.contains(*d)).collect())
        .unwrap_or_default();

    let mut markers: Vec<PickMarker> = picks
        .for_well(well.uwi())
        .filter_map(|p| {
            let depth = p.md.filter(|d| *d > axis.top && *d < axis.base)?;
            Some(PickMarker {
                top_name: p.top_name.clone(),
                depth,
                label_x: cfg.label_x,
                style: legend.style_or_default(&p.top_name),
            })
        })
        .collect();
    markers.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    let title = well.uwi().to_string();
    let title_rotation = if title.chars().count() > cfg.max_title_len {
        90.0
    } else {
        0.0
    };

    Column {
        uwi: well.uwi().clone(),
        title,
        title_rotation,
        show_depth_labels: leftmost,
        trace: Trace {
            curve: cfg.curve.clone(),
            points,
            color: cfg.trace_color,
            width: cfg.trace_width,
            missing: curve.is_none(),
        },
        markers,
    }
}
