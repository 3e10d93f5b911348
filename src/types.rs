//! Shared identifiers and primitive aliases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stratigraphic top (formation) name.
pub type TopName = String;
/// Curve mnemonic, e.g. `GR` or `RD`.
pub type CurveName = String;
/// Measured depth along the wellbore.
pub type Depth = f64;
/// Monotonic pick-store version, bumped on every mutation.
pub type StoreVersion = u64;

/// Unique well identifier in canonical form.
///
/// Construction trims the input and replaces every run of whitespace with a
/// single `-`, so `"Poseidon North 1"` and `"Poseidon-North-1"` are the same
/// well. This is the only constructor; identifiers are normalized once when
/// they enter the crate and compared by exact equality afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Uwi(String);

impl Uwi {
    /// Normalizes `raw` into a canonical identifier.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let mut out = String::new();
        for part in raw.as_ref().split_whitespace() {
            if !out.is_empty() {
                out.push('-');
            }
            out.push_str(part);
        }
        Self(out)
    }

    /// Canonical identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier is empty after normalization.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Uwi {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Uwi {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Uwi> for String {
    fn from(value: Uwi) -> Self {
        value.0
    }
}

impl AsRef<str> for Uwi {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uwi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
