//! Single-well log view: curve tracks side by side on one reversed depth axis,
//! with a horizontal marker across all tracks for every placed pick.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    pick::Pick,
    types::{CurveName, Depth, Uwi},
    well::{Well, finite_range},
};

use super::{
    DepthWindow,
    legend::LegendSource,
    scene::{AxisScale, Color, DepthAxis, PickMarker, Trace},
};

const TRACK_GAP: f64 = 0.1;
const LABEL_X: f64 = 0.5;

/// Log-view layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogViewConfig {
    /// Tracks drawn after the active curve; duplicates are dropped.
    pub companion_tracks: Vec<CurveName>,
    /// Fixed scales per curve; other curves are fitted to their data.
    pub scales: HashMap<CurveName, AxisScale>,
    /// Trace colors per curve.
    pub colors: HashMap<CurveName, Color>,
    /// Trace width in points.
    pub trace_width: f32,
}

impl Default for LogViewConfig {
    fn default() -> Self {
        Self {
            companion_tracks: vec!["RD".to_string()],
            scales: HashMap::from([
                ("GR".to_string(), AxisScale::Linear { min: 0.0, max: 120.0 }),
                ("RD".to_string(), AxisScale::Log { min: 0.1, max: 10_000.0 }),
            ]),
            colors: HashMap::from([("GR".to_string(), Color::LIME_GREEN)]),
            trace_width: 1.0,
        }
    }
}

/// One curve track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Curve trace; empty when the well lacks the curve.
    pub trace: Trace,
    /// Horizontal scale, independent per track.
    pub scale: AxisScale,
    /// Horizontal extent as fractions of the figure width.
    pub domain: (f64, f64),
}

/// Rendered log view of one well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogView {
    /// Well shown.
    pub uwi: Uwi,
    /// Figure title.
    pub title: String,
    /// Shared depth axis.
    pub depth_axis: DepthAxis,
    /// Tracks from left to right.
    pub tracks: Vec<Track>,
    /// Markers spanning every track, in depth order.
    pub markers: Vec<PickMarker>,
}

/// Renders `well` with the placed picks among `picks`.
///
/// Picks of other wells and picks without a depth are skipped. A track whose
/// curve the well does not carry is drawn empty rather than failing the view.
pub fn render_log_view<'a>(
    well: &Well,
    picks: impl IntoIterator<Item = &'a Pick>,
    active_curve: Option<&str>,
    legend: &dyn LegendSource,
    window: &DepthWindow,
    cfg: &LogViewConfig,
) -> LogView {
    let mut curves: Vec<&str> = Vec::new();
    for name in active_curve.into_iter().chain(cfg.companion_tracks.iter().map(String::as_str)) {
        if !curves.contains(&name) {
            curves.push(name);
        }
    }

    let n = curves.len().max(1) as f64;
    let width = (1.0 - TRACK_GAP * (n - 1.0)) / n;
    let tracks: Vec<Track> = curves
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let left = i as f64 * (width + TRACK_GAP);
            build_track(well, name, (left, left + width), cfg)
        })
        .collect();

    let mut markers: Vec<PickMarker> = picks
        .into_iter()
        .filter(|p| &p.uwi == well.uwi())
        .filter_map(|p| {
            let depth = p.md?;
            Some(PickMarker {
                top_name: p.top_name.clone(),
                depth,
                label_x: LABEL_X,
                style: legend.style_or_default(&p.top_name),
            })
        })
        .collect();
    markers.sort_by(|a, b| a.depth.total_cmp(&b.depth));

    let (top, base) = depth_extent(well, &markers);
    LogView {
        uwi: well.uwi().clone(),
        title: well.name().to_string(),
        depth_axis: DepthAxis {
            top,
            base,
            major: window.major,
            minor: window.minor,
        },
        tracks,
        markers,
    }
}

fn build_track(well: &Well, name: &str, domain: (f64, f64), cfg: &LogViewConfig) -> Track {
    let curve = well.curve(name);
    let points: Vec<(f64, Depth)> = curve.map(|c| c.samples().collect()).unwrap_or_default();

    let scale = cfg.scales.get(name).copied().unwrap_or_else(|| {
        AxisScale::fit_linear(finite_range(points.iter().map(|(v, _)| *v)))
    });
    // Log tracks cannot place non-positive samples.
    let points = match scale {
        AxisScale::Log { .. } => points.into_iter().filter(|(v, _)| *v > 0.0).collect(),
        AxisScale::Linear { .. } => points,
    };

    Track {
        trace: Trace {
            curve: name.to_string(),
            points,
            color: cfg.colors.get(name).copied().unwrap_or(Color::PLOTLY_BLUE),
            width: cfg.trace_width,
            missing: curve.is_none(),
        },
        scale,
        domain,
    }
}

fn depth_extent(well: &Well, markers: &[PickMarker]) -> (Depth, Depth) {
    let picks = finite_range(markers.iter().map(|m| m.depth));
    match (well.depth_range(), picks) {
        (Some((a, b)), Some((c, d))) => (a.min(c), b.max(d)),
        (Some(r), None) | (None, Some(r)) => r,
        (None, None) => (0.0, 1.0),
    }
}
