//! Read-only well and curve store.

use std::{collections::BTreeMap, io::Read, sync::Arc};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::types::{CurveName, Depth, Uwi};

/// Upper bound on the samples a resampled curve may hold.
pub const MAX_RESAMPLED: usize = 1_000_000;

/// Curve construction failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    /// `values` and `basis` differ in length.
    #[error("curve {name}: {values} values but {basis} basis samples")]
    LengthMismatch {
        /// Curve name.
        name: CurveName,
        /// Number of values.
        values: usize,
        /// Number of basis samples.
        basis: usize,
    },
    /// Depth basis changes direction or contains NaN.
    #[error("curve {name}: depth basis is not monotonic")]
    NonMonotonicBasis {
        /// Curve name.
        name: CurveName,
    },
    /// Resampling step must be finite, positive and not so fine that the
    /// curve would exceed the sample limit.
    #[error("curve {name}: invalid resample step {step}")]
    InvalidStep {
        /// Curve name.
        name: CurveName,
        /// Rejected step.
        step: f64,
    },
}

/// Well and well-set construction failures.
#[derive(Debug, thiserror::Error)]
pub enum WellError {
    /// Invalid curve data.
    #[error(transparent)]
    Curve(#[from] CurveError),
    /// No loaded well has this identifier.
    #[error("unknown well {0}")]
    UnknownWell(Uwi),
    /// Two wells normalize to the same identifier.
    #[error("duplicate well identifier {0}")]
    DuplicateWell(Uwi),
    /// Well identifier is empty after normalization.
    #[error("well identifier is empty")]
    EmptyUwi,
    /// A session needs at least one well.
    #[error("no wells loaded")]
    NoWells,
    /// Requested curve is not carried by the well.
    #[error("well {uwi} has no curve {curve}")]
    MissingCurve {
        /// Well identifier.
        uwi: Uwi,
        /// Curve name.
        curve: CurveName,
    },
    /// Source could not be decoded.
    #[error("well source decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Named depth-indexed sample series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    name: CurveName,
    values: Vec<f64>,
    basis: Vec<Depth>,
}

impl Curve {
    /// Builds a curve, checking lengths and basis monotonicity.
    ///
    /// Missing samples are carried as NaN in `values`; the basis itself must
    /// be NaN-free and either non-decreasing or non-increasing.
    pub fn new(
        name: impl Into<CurveName>,
        values: Vec<f64>,
        basis: Vec<Depth>,
    ) -> Result<Self, CurveError> {
        let name = name.into();
        if values.len() != basis.len() {
            return Err(CurveError::LengthMismatch {
                name,
                values: values.len(),
                basis: basis.len(),
            });
        }
        if !is_monotonic(&basis) {
            return Err(CurveError::NonMonotonicBasis { name });
        }
        Ok(Self {
            name,
            values,
            basis,
        })
    }

    /// Curve mnemonic.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sample values; NaN marks a missing sample.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Depth of each sample.
    pub fn basis(&self) -> &[Depth] {
        &self.basis
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the curve carries no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shallowest and deepest basis depth.
    pub fn depth_range(&self) -> Option<(Depth, Depth)> {
        let first = *self.basis.first()?;
        let last = *self.basis.last()?;
        Some((first.min(last), first.max(last)))
    }

    /// Smallest and largest finite sample value.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        finite_range(self.values.iter().copied())
    }

    /// `(value, depth)` pairs with missing samples dropped.
    pub fn samples(&self) -> impl Iterator<Item = (f64, Depth)> + '_ {
        self.values
            .iter()
            .copied()
            .zip(self.basis.iter().copied())
            .filter(|(v, _)| v.is_finite())
    }

    /// Linearly interpolated value at `depth`, `None` outside the basis or
    /// next to a missing sample.
    pub fn value_at(&self, depth: Depth) -> Option<f64> {
        let (lo, hi) = self.depth_range()?;
        if depth < lo || depth > hi {
            return None;
        }
        let ascending = self.basis.first() <= self.basis.last();
        // Index of the first sample at or beyond `depth` in basis order.
        let idx = if ascending {
            self.basis.partition_point(|d| *d < depth)
        } else {
            self.basis.partition_point(|d| *d > depth)
        };
        if idx < self.basis.len() && self.basis[idx] == depth {
            let v = self.values[idx];
            return v.is_finite().then_some(v);
        }
        if idx == 0 || idx >= self.basis.len() {
            return None;
        }
        let (d0, d1) = (self.basis[idx - 1], self.basis[idx]);
        let (v0, v1) = (self.values[idx - 1], self.values[idx]);
        if !v0.is_finite() || !v1.is_finite() || d0 == d1 {
            return None;
        }
        Some(v0 + (v1 - v0) * (depth - d0) / (d1 - d0))
    }

    /// Returns a new curve sampled every `step` across the same depth range,
    /// keeping the direction of the original basis.
    pub fn resample(&self, step: f64) -> Result<Self, CurveError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(CurveError::InvalidStep {
                name: self.name.clone(),
                step,
            });
        }
        let Some((lo, hi)) = self.depth_range() else {
            return Ok(self.clone());
        };

        let intervals = ((hi - lo) / step).floor();
        if intervals >= MAX_RESAMPLED as f64 {
            return Err(CurveError::InvalidStep {
                name: self.name.clone(),
                step,
            });
        }
        let count = intervals as usize + 1;
        let mut basis: Vec<Depth> = (0..count).map(|i| lo + step * i as f64).collect();
        if self.basis.first() > self.basis.last() {
            basis.reverse();
        }
        let values = basis
            .iter()
            .map(|d| self.value_at(*d).unwrap_or(f64::NAN))
            .collect();

        debug!(curve = %self.name, step, samples = count, "resampled curve");
        Self::new(self.name.clone(), values, basis)
    }
}

impl<'de> Deserialize<'de> for Curve {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawCurve {
            name: CurveName,
            values: Vec<Option<f64>>,
            basis: Vec<Depth>,
        }

        let raw = RawCurve::deserialize(deserializer)?;
        let values = raw
            .values
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        Curve::new(raw.name, values, raw.basis).map_err(serde::de::Error::custom)
    }
}

/// One well: identifier, display name and its curves keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Well {
    uwi: Uwi,
    name: String,
    curves: BTreeMap<CurveName, Curve>,
}

impl Well {
    /// Builds a well; a later curve with the same name replaces an earlier one.
    pub fn new(
        uwi: impl Into<Uwi>,
        name: impl Into<String>,
        curves: impl IntoIterator<Item = Curve>,
    ) -> Result<Self, WellError> {
        let uwi = uwi.into();
        if uwi.is_empty() {
            return Err(WellError::EmptyUwi);
        }
        let curves = curves
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();
        Ok(Self {
            uwi,
            name: name.into(),
            curves,
        })
    }

    /// Canonical well identifier.
    pub fn uwi(&self) -> &Uwi {
        &self.uwi
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Curve by name.
    pub fn curve(&self, name: &str) -> Option<&Curve> {
        self.curves.get(name)
    }

    /// True when the well carries `name`.
    pub fn has_curve(&self, name: &str) -> bool {
        self.curves.contains_key(name)
    }

    /// Sorted curve names for this well.
    pub fn curve_names(&self) -> Vec<CurveName> {
        self.curves.keys().cloned().collect()
    }

    /// `GR` when present, otherwise the first curve in name order.
    pub fn default_curve(&self) -> Option<&str> {
        if self.curves.contains_key("GR") {
            return Some("GR");
        }
        self.curves.keys().next().map(String::as_str)
    }

    /// Union of all curve depth ranges.
    pub fn depth_range(&self) -> Option<(Depth, Depth)> {
        self.curves
            .values()
            .filter_map(Curve::depth_range)
            .reduce(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
    }

    /// Returns a copy of this well with `curve` resampled every `step`.
    pub fn with_resampled(&self, curve: &str, step: f64) -> Result<Self, WellError> {
        let source = self.curve(curve).ok_or_else(|| WellError::MissingCurve {
            uwi: self.uwi.clone(),
            curve: curve.to_string(),
        })?;
        let resampled = source.resample(step)?;
        let mut out = self.clone();
        out.curves.insert(resampled.name.clone(), resampled);
        Ok(out)
    }
}

impl<'de> Deserialize<'de> for Well {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawWell {
            uwi: Uwi,
            #[serde(default)]
            name: Option<String>,
            #[serde(default)]
            curves: Vec<Curve>,
        }

        let raw = RawWell::deserialize(deserializer)?;
        let name = raw.name.unwrap_or_else(|| raw.uwi.to_string());
        Well::new(raw.uwi, name, raw.curves).map_err(serde::de::Error::custom)
    }
}

/// Immutable collection of the wells in a session, in load order.
#[derive(Debug, Clone)]
pub struct WellSet {
    wells: Vec<Arc<Well>>,
}

impl WellSet {
    /// Builds a non-empty set with unique identifiers.
    pub fn new(wells: impl IntoIterator<Item = Well>) -> Result<Self, WellError> {
        let mut out: Vec<Arc<Well>> = Vec::new();
        for well in wells {
            if out.iter().any(|w| w.uwi == well.uwi) {
                return Err(WellError::DuplicateWell(well.uwi));
            }
            out.push(Arc::new(well));
        }
        if out.is_empty() {
            return Err(WellError::NoWells);
        }
        info!(wells = out.len(), "well set loaded");
        Ok(Self { wells: out })
    }

    /// Decodes a JSON array of wells.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, WellError> {
        let wells: Vec<Well> = serde_json::from_reader(reader)?;
        Self::new(wells)
    }

    /// Well by identifier.
    pub fn get(&self, uwi: &Uwi) -> Option<&Arc<Well>> {
        self.wells.iter().find(|w| &w.uwi == uwi)
    }

    /// True when `uwi` is a loaded well.
    pub fn contains(&self, uwi: &Uwi) -> bool {
        self.get(uwi).is_some()
    }

    /// First well in load order.
    pub fn first(&self) -> &Arc<Well> {
        &self.wells[0]
    }

    /// Wells in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Well>> {
        self.wells.iter()
    }

    /// Identifiers in sorted order, for the well selector.
    pub fn sorted_uwis(&self) -> Vec<Uwi> {
        let mut uwis: Vec<Uwi> = self.wells.iter().map(|w| w.uwi.clone()).collect();
        uwis.sort();
        uwis
    }

    /// Sorted union of curve names across all wells.
    pub fn all_curve_names(&self) -> Vec<CurveName> {
        let mut names: Vec<CurveName> = self.wells.iter().flat_map(|w| w.curve_names()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Number of wells.
    pub fn len(&self) -> usize {
        self.wells.len()
    }

    /// Always false; construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    /// Returns a new set with `well` replacing the entry of the same identifier.
    pub fn with_well(&self, well: Well) -> Result<Self, WellError> {
        let idx = self
            .wells
            .iter()
            .position(|w| w.uwi == well.uwi)
            .ok_or_else(|| WellError::UnknownWell(well.uwi.clone()))?;
        let mut wells = self.wells.clone();
        wells[idx] = Arc::new(well);
        Ok(Self { wells })
    }
}

fn is_monotonic(basis: &[Depth]) -> bool {
    if basis.iter().any(|d| d.is_nan()) {
        return false;
    }
    basis.windows(2).all(|w| w[0] <= w[1]) || basis.windows(2).all(|w| w[0] >= w[1])
}

pub(crate) fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gr() -> Curve {
        Curve::new("GR", vec![10.0, 20.0, f64::NAN, 40.0], vec![100.0, 101.0, 102.0, 103.0]).unwrap()
    }

    #[test]
    fn rejects_mismatched_lengths_and_zigzag_basis() {
        assert!(matches!(
            Curve::new("GR", vec![1.0], vec![1.0, 2.0]),
            Err(CurveError::LengthMismatch { .. })
        ));
        assert!(matches!(
            Curve::new("GR", vec![1.0, 2.0, 3.0], vec![1.0, 3.0, 2.0]),
            Err(CurveError::NonMonotonicBasis { .. })
        ));
        assert!(Curve::new("GR", vec![1.0, 2.0], vec![5.0, 4.0]).is_ok());
    }

    #[test]
    fn interpolates_and_skips_missing_samples() {
        let c = gr();
        assert_eq!(c.value_at(100.5), Some(15.0));
        assert_eq!(c.value_at(101.0), Some(20.0));
        assert_eq!(c.value_at(101.5), None);
        assert_eq!(c.value_at(99.0), None);
        assert_eq!(c.value_range(), Some((10.0, 40.0)));
    }

    #[test]
    fn resample_keeps_name_and_range() {
        let c = Curve::new("RD", vec![1.0, 3.0], vec![200.0, 201.0]).unwrap();
        let r = c.resample(0.5).unwrap();
        assert_eq!(r.name(), "RD");
        assert_eq!(r.basis(), &[200.0, 200.5, 201.0]);
        assert_eq!(r.values(), &[1.0, 2.0, 3.0]);
        assert!(c.resample(0.0).is_err());
    }

    #[test]
    fn resample_rejects_steps_finer_than_the_sample_limit() {
        let c = Curve::new("RD", vec![1.0, 3.0], vec![0.0, 5000.0]).unwrap();
        assert!(matches!(
            c.resample(1e-300),
            Err(CurveError::InvalidStep { .. })
        ));
        assert!(matches!(
            c.resample(5000.0 / MAX_RESAMPLED as f64 / 2.0),
            Err(CurveError::InvalidStep { .. })
        ));
        assert_eq!(c.resample(1.0).unwrap().len(), 5001);
    }

    #[test]
    fn resampled_well_replaces_curve_in_a_new_set() {
        let set = WellSet::new(vec![Well::new("A-1", "A-1", vec![gr()]).unwrap()]).unwrap();
        let original = set.first();
        let fine = original.with_resampled("GR", 0.5).unwrap();
        assert_eq!(fine.curve("GR").unwrap().len(), 7);
        assert!(matches!(
            original.with_resampled("RD", 0.5),
            Err(WellError::MissingCurve { .. })
        ));

        let updated = set.with_well(fine).unwrap();
        assert_eq!(updated.first().curve("GR").unwrap().len(), 7);
        assert_eq!(set.first().curve("GR").unwrap().len(), 4);
    }

    #[test]
    fn default_curve_prefers_gamma_ray() {
        let rd = Curve::new("RD", vec![], vec![]).unwrap();
        let well = Well::new("A 1", "A-1", vec![rd.clone(), gr()]).unwrap();
        assert_eq!(well.uwi().as_str(), "A-1");
        assert_eq!(well.default_curve(), Some("GR"));

        let other = Well::new("B-2", "B-2", vec![rd]).unwrap();
        assert_eq!(other.default_curve(), Some("RD"));
    }

    #[test]
    fn well_set_rejects_duplicates_after_normalization() {
        let a = Well::new("A 1", "A", vec![]).unwrap();
        let b = Well::new("A-1", "A again", vec![]).unwrap();
        assert!(matches!(WellSet::new(vec![a, b]), Err(WellError::DuplicateWell(_))));
        assert!(matches!(WellSet::new(Vec::new()), Err(WellError::NoWells)));
    }

    #[test]
    fn decodes_null_samples_as_missing() {
        let json = r#"[{"uwi":"Torosa 1","curves":[{"name":"GR","values":[1.0,null],"basis":[1.0,2.0]}]}]"#;
        let set = WellSet::from_json_reader(json.as_bytes()).unwrap();
        let well = set.get(&Uwi::new("Torosa-1")).unwrap();
        assert_eq!(well.name(), "Torosa-1");
        assert!(well.curve("GR").unwrap().values()[1].is_nan());
    }
}
