//! Application configuration loaded from TOML.
//!
//! Search order: explicit path → `$WELLCORR_CONFIG` → `./wellcorr.toml` →
//! built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    runtime::handle::RuntimeConfig,
    views::{
        ViewConfig,
        legend::{Legend, LegendEntry},
    },
};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "WELLCORR_CONFIG";
/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "wellcorr.toml";

/// Configuration failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read.
    #[error("reading {path}: {source}")]
    Io {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// File is not valid config TOML.
    #[error("parsing {path}: {source}")]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
}

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory relative save paths are resolved under.
    pub save_dir: PathBuf,
    /// View layout.
    pub views: ViewConfig,
    /// Legend rows.
    pub legend: Vec<LegendEntry>,
    /// Runtime queue sizes.
    pub runtime: RuntimeConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("data/updates"),
            views: ViewConfig::default(),
            legend: Vec::new(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parses config text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads and parses one file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Loads the first config found in the search order.
    ///
    /// An explicit path must load; the fallbacks warn and continue.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(cfg) => return Ok(cfg),
                    Err(e) => warn!(error = %e, "ignoring {CONFIG_ENV}"),
                }
            } else {
                warn!(path = %p.display(), "{CONFIG_ENV} file not found");
            }
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(cfg) => return Ok(cfg),
                Err(e) => warn!(error = %e, "ignoring local config"),
            }
        }

        info!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Legend built from the configured rows.
    pub fn legend(&self) -> Legend {
        Legend::new(self.legend.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::scene::AxisScale;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = AppConfig::from_toml_str(
            r##"
save_dir = "out"

[views.window]
top = 1000.0
base = 2000.0

[views.section]
curve = "RD"
scale = { kind = "log", min = 0.2, max = 2000.0 }

[[legend]]
top = "Montara"
color = "#ff8800"
"##,
        )
        .unwrap();

        assert_eq!(cfg.save_dir, PathBuf::from("out"));
        assert_eq!(cfg.views.window.top, 1000.0);
        assert_eq!(cfg.views.window.major, 100.0);
        assert_eq!(cfg.views.section.curve, "RD");
        assert_eq!(cfg.views.section.scale, AxisScale::Log { min: 0.2, max: 2000.0 });
        assert_eq!(cfg.views.section.max_title_len, 10);
        assert_eq!(cfg.views.log.companion_tracks, vec!["RD".to_string()]);
        assert_eq!(cfg.legend().len(), 1);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/wellcorr.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
