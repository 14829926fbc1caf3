//! The accept/reject decision.

use std::fmt;

use tracing::debug;

use crate::config::QcConfig;

/// Why an observation value was rejected.
///
/// Rejection is not an error: the observation is simply left out of
/// verification and counted separately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QcRejection {
    /// No value was reported.
    Missing,
    /// The value is NaN or infinite.
    NonFinite,
    /// The value equals a missing-value sentinel.
    Sentinel {
        /// The sentinel that matched.
        value: f64,
    },
    /// The value lies outside the variable's plausible range.
    OutOfRange {
        /// The rejected value.
        value: f64,
        /// Lower bound of the range, inclusive.
        min: f64,
        /// Upper bound of the range, inclusive.
        max: f64,
    },
}

impl fmt::Display for QcRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing value"),
            Self::NonFinite => write!(f, "non-finite value"),
            Self::Sentinel { value } => write!(f, "sentinel value {value}"),
            Self::OutOfRange { value, min, max } => {
                write!(f, "value {value} outside plausible range [{min}, {max}]")
            }
        }
    }
}

impl QcConfig {
    /// Screens one observation value.
    ///
    /// Returns the accepted value, or the reason it was rejected. Sentinels
    /// are rejected even when they fall inside the plausible range.
    pub fn check(&self, value: Option<f64>, variable: &str) -> Result<f64, QcRejection> {
        let value = value.ok_or(QcRejection::Missing)?;
        if !value.is_finite() {
            return Err(QcRejection::NonFinite);
        }
        if self.sentinels().contains(&value) {
            return Err(QcRejection::Sentinel { value });
        }
        let Some(range) = self.range(variable) else {
            return Ok(value);
        };
        if !range.contains(value) {
            debug!(
                variable,
                value,
                min = range.min,
                max = range.max,
                "observation outside plausible range"
            );
            return Err(QcRejection::OutOfRange {
                value,
                min: range.min,
                max: range.max,
            });
        }
        Ok(value)
    }

    /// Returns true if the value passes every QC check.
    pub fn accept(&self, value: Option<f64>, variable: &str) -> bool {
        self.check(value, variable).is_ok()
    }
}
