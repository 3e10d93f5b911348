//! Renderable primitives shared by the log view and the cross-section.
//!
//! Views reduce to these plain values; turning them into pixels is left to the
//! caller's plotting backend.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{CurveName, Depth, TopName};

/// 8-bit RGBA color, written as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Matplotlib `dimgrey`.
    pub const DIM_GREY: Self = Self::rgb(0x69, 0x69, 0x69);
    /// Plotly `limegreen`.
    pub const LIME_GREEN: Self = Self::rgb(0x32, 0xcd, 0x32);
    /// Plotly default trace blue.
    pub const PLOTLY_BLUE: Self = Self::rgb(0x63, 0x6e, 0xfa);

    /// Opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Copy with a new alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parses `#rgb`, `#rrggbb` or `#rrggbbaa`; the `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => {
                let mut it = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Self::rgb(it.next()??, it.next()??, it.next()??))
            }
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?).with_alpha(byte(6)?)),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color {value:?}"))
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

/// Horizontal scale of a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AxisScale {
    /// Linear between `min` and `max`.
    Linear {
        /// Left edge.
        min: f64,
        /// Right edge.
        max: f64,
    },
    /// Base-10 logarithmic between `min` and `max` (both positive).
    Log {
        /// Left edge.
        min: f64,
        /// Right edge.
        max: f64,
    },
}

impl AxisScale {
    /// Fraction of the track width at which `value` sits; may fall outside
    /// `0..=1`. `None` for values the scale cannot place.
    pub fn fraction(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        match *self {
            Self::Linear { min, max } => (max != min).then(|| (value - min) / (max - min)),
            Self::Log { min, max } => {
                if value <= 0.0 || min <= 0.0 || max <= 0.0 || max == min {
                    return None;
                }
                Some((value.log10() - min.log10()) / (max.log10() - min.log10()))
            }
        }
    }

    /// Linear scale over the data range, widened when the range is a point.
    pub fn fit_linear(range: Option<(f64, f64)>) -> Self {
        match range {
            Some((lo, hi)) if hi > lo => Self::Linear { min: lo, max: hi },
            Some((v, _)) => Self::Linear {
                min: v - 1.0,
                max: v + 1.0,
            },
            None => Self::Linear { min: 0.0, max: 1.0 },
        }
    }
}

/// Shared vertical axis. Depth increases downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthAxis {
    /// Shallowest depth shown (top edge).
    pub top: Depth,
    /// Deepest depth shown (bottom edge).
    pub base: Depth,
    /// Spacing of labelled ticks; zero disables ticks.
    pub major: f64,
    /// Spacing of unlabelled ticks; zero disables them.
    pub minor: f64,
}

impl DepthAxis {
    /// True when `depth` lies within the axis, edges included.
    pub fn contains(&self, depth: Depth) -> bool {
        depth >= self.top && depth <= self.base
    }

    /// Vertical fraction from the top edge.
    pub fn fraction(&self, depth: Depth) -> f64 {
        if self.base == self.top {
            return 0.0;
        }
        (depth - self.top) / (self.base - self.top)
    }

    /// Major tick depths within the axis.
    pub fn major_ticks(&self) -> Vec<Depth> {
        ticks(self.top, self.base, self.major)
    }

    /// Minor tick depths within the axis, majors excluded.
    pub fn minor_ticks(&self) -> Vec<Depth> {
        ticks(self.top, self.base, self.minor)
            .into_iter()
            .filter(|d| self.major <= 0.0 || (d / self.major).fract().abs() > 1e-9)
            .collect()
    }
}

fn ticks(top: Depth, base: Depth, step: f64) -> Vec<Depth> {
    if step <= 0.0 || !step.is_finite() || base < top {
        return Vec::new();
    }
    let first = (top / step).ceil() as i64;
    let last = (base / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// One curve drawn as a polyline of `(value, depth)` points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Curve mnemonic.
    pub curve: CurveName,
    /// `(value, depth)` points; missing samples are dropped.
    pub points: Vec<(f64, Depth)>,
    /// Line color.
    pub color: Color,
    /// Line width in points.
    pub width: f32,
    /// True when the well does not carry this curve.
    pub missing: bool,
}

/// Hatch pattern of a legend entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hatch {
    /// Solid line, no pattern.
    #[default]
    None,
    /// Dashed line.
    Dashed,
    /// Dotted line.
    Dotted,
}

/// Visual style of a pick marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    /// Line color.
    pub color: Color,
    /// Line width in points.
    pub width: f32,
    /// Line pattern.
    #[serde(default)]
    pub hatch: Hatch,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            color: Color::DIM_GREY,
            width: 2.0,
            hatch: Hatch::None,
        }
    }
}

/// Horizontal line plus text label at a pick depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickMarker {
    /// Label text.
    pub top_name: TopName,
    /// Line depth.
    pub depth: Depth,
    /// Horizontal label anchor as a fraction of the panel width.
    pub label_x: f64,
    /// Line style.
    pub style: MarkerStyle,
}
