//! Top-name styling.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::scene::{Color, Hatch, MarkerStyle};

/// Maps a top name to its marker style.
pub trait LegendSource: Send + Sync {
    /// Style for `top_name`, if the source has one.
    fn style(&self, top_name: &str) -> Option<MarkerStyle>;

    /// Style for `top_name`, falling back to the default marker.
    fn style_or_default(&self, top_name: &str) -> MarkerStyle {
        self.style(top_name).unwrap_or_default()
    }
}

/// One legend row as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Top name the entry applies to (case-insensitive).
    pub top: String,
    /// Line color.
    pub color: Color,
    /// Line width; defaults to 2.
    #[serde(default)]
    pub width: Option<f32>,
    /// Line pattern.
    #[serde(default)]
    pub hatch: Hatch,
}

/// In-memory legend keyed by lower-cased top name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Legend {
    styles: HashMap<String, MarkerStyle>,
}

impl Legend {
    /// Builds a legend; later entries for the same top win.
    pub fn new(entries: impl IntoIterator<Item = LegendEntry>) -> Self {
        let mut legend = Self::default();
        for entry in entries {
            legend.insert(&entry.top, MarkerStyle {
                color: entry.color,
                width: entry.width.unwrap_or(MarkerStyle::default().width),
                hatch: entry.hatch,
            });
        }
        legend
    }

    /// Sets the style of `top_name`.
    pub fn insert(&mut self, top_name: &str, style: MarkerStyle) {
        self.styles.insert(top_name.trim().to_lowercase(), style);
    }

    /// Number of styled tops.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// True when no top is styled.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl LegendSource for Legend {
    fn style(&self, top_name: &str) -> Option<MarkerStyle> {
        self.styles.get(&top_name.trim().to_lowercase()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_top_falls_back_to_default_style() {
        let legend = Legend::new(vec![LegendEntry {
            top: "Montara".to_string(),
            color: Color::rgb(0xff, 0, 0),
            width: None,
            hatch: Hatch::Dashed,
        }]);
        assert_eq!(legend.style_or_default("montara ").color, Color::rgb(0xff, 0, 0));
        assert_eq!(legend.style_or_default("Plover"), MarkerStyle::default());
    }
}
