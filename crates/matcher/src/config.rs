//! Tolerances for forecast/observation matching.

use chrono::TimeDelta;

use crate::error::MatchError;

/// Spatial and temporal tolerances for a match.
///
/// # Example
///
/// ```
/// use vericast_match::MatchConfig;
///
/// let config = MatchConfig::default()
///     .with_spatial_threshold_km(25.0)
///     .with_temporal_threshold_hours(3.0);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Maximum great-circle distance, inclusive.
    spatial_threshold_km: f64,
    /// Maximum |valid_time - obs_time|, inclusive.
    temporal_threshold_hours: f64,
}

impl Default for MatchConfig {
    /// 50 km and 1 hour.
    fn default() -> Self {
        Self {
            spatial_threshold_km: 50.0,
            temporal_threshold_hours: 1.0,
        }
    }
}

impl MatchConfig {
    /// Sets the spatial tolerance in kilometres.
    pub fn with_spatial_threshold_km(mut self, km: f64) -> Self {
        self.spatial_threshold_km = km;
        self
    }

    /// Sets the temporal tolerance in hours.
    pub fn with_temporal_threshold_hours(mut self, hours: f64) -> Self {
        self.temporal_threshold_hours = hours;
        self
    }

    /// Returns the spatial tolerance in kilometres.
    pub fn spatial_threshold_km(&self) -> f64 {
        self.spatial_threshold_km
    }

    /// Returns the temporal tolerance in hours.
    pub fn temporal_threshold_hours(&self) -> f64 {
        self.temporal_threshold_hours
    }

    /// Returns the temporal tolerance as a duration, at microsecond precision.
    pub fn temporal_window(&self) -> TimeDelta {
        TimeDelta::microseconds((self.temporal_threshold_hours * 3_600_000_000.0).round() as i64)
    }

    /// Validates this configuration.
    ///
    /// Both tolerances must be finite and non-negative.
    pub fn validate(&self) -> Result<(), MatchError> {
        if !self.spatial_threshold_km.is_finite() || self.spatial_threshold_km < 0.0 {
            return Err(MatchError::InvalidSpatialThreshold {
                km: self.spatial_threshold_km,
            });
        }
        if !self.temporal_threshold_hours.is_finite() || self.temporal_threshold_hours < 0.0 {
            return Err(MatchError::InvalidTemporalThreshold {
                hours: self.temporal_threshold_hours,
            });
        }
        Ok(())
    }
}
