//! Record types exchanged with ingestion and persistence.

use chrono::{DateTime, Utc};
use serde::Serialize;
use vericast_contingency::{Operator, Outcome, ThresholdOutcome};

/// A ground-truth observation, as produced by ingestion.
///
/// `value` is `None` when the source reported no value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub station_id: String,
    pub obs_time: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub variable: String,
    pub value: Option<f64>,
    pub units: String,
    /// Source tag, e.g. `metar` or `buoy`.
    pub obs_type: String,
}

impl Observation {
    /// True when any identifying text field is empty.
    pub fn is_malformed(&self) -> bool {
        self.station_id.is_empty() || self.variable.is_empty() || self.units.is_empty()
    }
}

/// One forecast grid value, as produced by ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub model: String,
    pub init_time: DateTime<Utc>,
    pub valid_time: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub variable: String,
    pub value: f64,
    pub units: String,
}

impl ForecastPoint {
    /// Whole hours between initialisation and valid time.
    pub fn lead_time_hours(&self) -> i64 {
        (self.valid_time - self.init_time).num_hours()
    }

    /// True when the point cannot be a real forecast (valid before init,
    /// non-finite value or coordinates, empty identifiers).
    pub fn is_malformed(&self) -> bool {
        self.valid_time < self.init_time
            || !self.value.is_finite()
            || !self.lat.is_finite()
            || !self.lon.is_finite()
            || self.model.is_empty()
            || self.variable.is_empty()
            || self.units.is_empty()
    }
}

/// A persisted forecast/observation pair with its error terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationRecord {
    pub model: String,
    pub variable: String,
    pub station_id: String,
    pub valid_time: DateTime<Utc>,
    pub init_time: DateTime<Utc>,
    pub lead_time_hours: i64,
    pub obs_lat: f64,
    pub obs_lon: f64,
    pub forecast_value: f64,
    pub observed_value: f64,
    pub forecast_lat: f64,
    pub forecast_lon: f64,
    pub distance_km: f64,
    pub time_diff_hours: f64,
    pub error: f64,
    pub absolute_error: f64,
    pub squared_error: f64,
}

impl VerificationRecord {
    /// Names of numeric fields that are NaN or infinite.
    pub(crate) fn non_finite_fields(&self) -> Vec<&'static str> {
        [
            ("obs_lat", self.obs_lat),
            ("obs_lon", self.obs_lon),
            ("forecast_value", self.forecast_value),
            ("observed_value", self.observed_value),
            ("forecast_lat", self.forecast_lat),
            ("forecast_lon", self.forecast_lon),
            ("distance_km", self.distance_km),
            ("time_diff_hours", self.time_diff_hours),
            ("error", self.error),
            ("absolute_error", self.absolute_error),
            ("squared_error", self.squared_error),
        ]
        .into_iter()
        .filter(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
        .collect()
    }
}

/// A verification record together with the id persistence assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredVerification {
    pub id: u64,
    pub record: VerificationRecord,
}

/// A persisted threshold outcome, linked to its verification record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdRecord {
    pub verification_id: u64,
    pub threshold_value: f64,
    pub operator: Operator,
    pub forecast_exceeds: bool,
    pub observed_exceeds: bool,
    pub outcome: Outcome,
}

impl ThresholdRecord {
    /// Links a classification result to a verification id.
    pub fn from_outcome(verification_id: u64, o: &ThresholdOutcome) -> Self {
        Self {
            verification_id,
            threshold_value: o.threshold,
            operator: o.operator,
            forecast_exceeds: o.forecast_crosses,
            observed_exceeds: o.observed_crosses,
            outcome: o.outcome,
        }
    }
}

/// Everything persisted so far: verification rows and their threshold rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    pub verifications: Vec<StoredVerification>,
    pub thresholds: Vec<ThresholdRecord>,
}

impl History {
    /// True when nothing has been persisted.
    pub fn is_empty(&self) -> bool {
        self.verifications.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::TimeZone;

    use super::*;

    pub fn t(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, h, 0, 0).unwrap()
    }

    pub fn record(model: &str, variable: &str) -> VerificationRecord {
        VerificationRecord {
            model: model.to_string(),
            variable: variable.to_string(),
            station_id: "KSEA".to_string(),
            valid_time: t(12),
            init_time: t(6),
            lead_time_hours: 6,
            obs_lat: 47.45,
            obs_lon: -122.31,
            forecast_value: 18.5,
            observed_value: 19.2,
            forecast_lat: 47.5,
            forecast_lon: -122.25,
            distance_km: 7.1,
            time_diff_hours: 0.0,
            error: -0.7,
            absolute_error: 0.7,
            squared_error: 0.49,
        }
    }
}
