//! QC configuration: sentinels and per-variable plausible ranges.

use std::collections::BTreeMap;

use crate::error::QcError;

/// Inclusive physically plausible interval for a variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibleRange {
    /// Smallest accepted value.
    pub min: f64,
    /// Largest accepted value.
    pub max: f64,
}

impl PlausibleRange {
    /// Creates a range from inclusive bounds.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns true if `value` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Configuration for the observation quality-control filter.
///
/// Defaults:
///
/// | Variable | Range |
/// |----------|-------|
/// | `temperature_2m` | [213.15, 333.15] K |
/// | `wind_speed_10m` | [0, 77.2] m/s |
/// | `mslp` | [90000, 110000] Pa |
///
/// Sentinels default to `999.9` and `-999.9`.
#[derive(Debug, Clone)]
pub struct QcConfig {
    ranges: BTreeMap<String, PlausibleRange>,
    sentinels: Vec<f64>,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self::empty()
            .with_range("temperature_2m", PlausibleRange::new(213.15, 333.15))
            .with_range("wind_speed_10m", PlausibleRange::new(0.0, 77.2))
            .with_range("mslp", PlausibleRange::new(90_000.0, 110_000.0))
            .with_sentinels(vec![999.9, -999.9])
    }
}

impl QcConfig {
    /// A configuration with no ranges and no sentinels.
    pub fn empty() -> Self {
        Self {
            ranges: BTreeMap::new(),
            sentinels: Vec::new(),
        }
    }

    /// Adds or replaces the plausible range for `variable`.
    pub fn with_range(mut self, variable: impl Into<String>, range: PlausibleRange) -> Self {
        self.ranges.insert(variable.into(), range);
        self
    }

    /// Replaces the sentinel list.
    pub fn with_sentinels(mut self, sentinels: Vec<f64>) -> Self {
        self.sentinels = sentinels;
        self
    }

    /// Returns the plausible range for `variable`, if configured.
    pub fn range(&self, variable: &str) -> Option<&PlausibleRange> {
        self.ranges.get(variable)
    }

    /// Returns the sentinel values.
    pub fn sentinels(&self) -> &[f64] {
        &self.sentinels
    }

    /// Validates every range and sentinel.
    pub fn validate(&self) -> Result<(), QcError> {
        for (variable, r) in &self.ranges {
            if !r.min.is_finite() || !r.max.is_finite() {
                return Err(QcError::NonFiniteRange {
                    variable: variable.clone(),
                    min: r.min,
                    max: r.max,
                });
            }
            if r.min > r.max {
                return Err(QcError::InvertedRange {
                    variable: variable.clone(),
                    min: r.min,
                    max: r.max,
                });
            }
        }
        if self.sentinels.iter().any(|s| s.is_nan()) {
            return Err(QcError::NanSentinel);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranges() {
        let qc = QcConfig::default();
        assert_eq!(
            qc.range("temperature_2m"),
            Some(&PlausibleRange::new(213.15, 333.15))
        );
        assert_eq!(qc.range("wind_speed_10m").unwrap().max, 77.2);
        assert_eq!(qc.range("mslp").unwrap().min, 90_000.0);
        assert!(qc.range("dewpoint_2m").is_none());
        assert_eq!(qc.sentinels(), &[999.9, -999.9]);
        assert!(qc.validate().is_ok());
    }

    #[test]
    fn test_range_inclusive() {
        let r = PlausibleRange::new(0.0, 77.2);
        assert!(r.contains(0.0));
        assert!(r.contains(77.2));
        assert!(!r.contains(-0.01));
        assert!(!r.contains(77.21));
    }

    #[test]
    fn test_with_range_overrides() {
        let qc = QcConfig::default().with_range("mslp", PlausibleRange::new(85_000.0, 110_000.0));
        assert_eq!(qc.range("mslp").unwrap().min, 85_000.0);
    }

    #[test]
    fn test_validate_inverted() {
        let qc = QcConfig::empty().with_range("x", PlausibleRange::new(5.0, 1.0));
        assert!(matches!(qc.validate(), Err(QcError::InvertedRange { .. })));
    }

    #[test]
    fn test_validate_non_finite() {
        let qc = QcConfig::empty().with_range("x", PlausibleRange::new(f64::NAN, 1.0));
        assert!(matches!(qc.validate(), Err(QcError::NonFiniteRange { .. })));
    }

    #[test]
    fn test_validate_nan_sentinel() {
        let qc = QcConfig::empty().with_sentinels(vec![f64::NAN]);
        assert_eq!(qc.validate(), Err(QcError::NanSentinel));
    }
}
