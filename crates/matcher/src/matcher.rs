//! Per-observation nearest-forecast search.

use chrono::{DateTime, Utc};
use vericast_records::{ForecastPoint, Observation, VerificationRecord};
use vericast_stats::PairError;

use crate::config::MatchConfig;
use crate::distance::haversine_km;
use crate::error::MatchError;
use crate::index::ForecastIndex;

/// The forecast chosen for one observation location and time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    /// The nearest qualifying forecast point.
    pub forecast: &'a ForecastPoint,
    /// Great-circle distance to the observation.
    pub distance_km: f64,
    /// `|valid_time - obs_time|` in hours.
    pub time_diff_hours: f64,
}

/// An observation bound to its best forecast, with error terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedPair<'a> {
    /// The observation being verified.
    pub observation: &'a Observation,
    /// The forecast it was matched to.
    pub forecast: &'a ForecastPoint,
    /// The QC-accepted observed value.
    pub observed_value: f64,
    /// Great-circle distance between the two locations.
    pub distance_km: f64,
    /// `|valid_time - obs_time|` in hours.
    pub time_diff_hours: f64,
    /// `forecast - observed` and its absolute and squared forms.
    pub error: PairError,
}

impl<'a> MatchedPair<'a> {
    /// Scores a candidate against the observed value.
    pub fn new(observation: &'a Observation, observed_value: f64, candidate: Candidate<'a>) -> Self {
        Self {
            observation,
            forecast: candidate.forecast,
            observed_value,
            distance_km: candidate.distance_km,
            time_diff_hours: candidate.time_diff_hours,
            error: PairError::score(candidate.forecast.value, observed_value),
        }
    }

    /// The persisted form of this pair. Model and variable come from the
    /// forecast, so aliased observation names are stored canonically.
    pub fn to_record(&self) -> VerificationRecord {
        VerificationRecord {
            model: self.forecast.model.clone(),
            variable: self.forecast.variable.clone(),
            station_id: self.observation.station_id.clone(),
            valid_time: self.forecast.valid_time,
            init_time: self.forecast.init_time,
            lead_time_hours: self.forecast.lead_time_hours(),
            obs_lat: self.observation.lat,
            obs_lon: self.observation.lon,
            forecast_value: self.forecast.value,
            observed_value: self.observed_value,
            forecast_lat: self.forecast.lat,
            forecast_lon: self.forecast.lon,
            distance_km: self.distance_km,
            time_diff_hours: self.time_diff_hours,
            error: self.error.error,
            absolute_error: self.error.absolute_error,
            squared_error: self.error.squared_error,
        }
    }
}

/// Finds, for each observation independently, the nearest forecast point.
///
/// Matching is greedy: several observations may bind to the same forecast
/// point. The matcher only reads its index, so it can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct Matcher {
    index: ForecastIndex,
    config: MatchConfig,
}

impl Matcher {
    /// Creates a matcher over an index.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the configuration is invalid.
    pub fn new(index: ForecastIndex, config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { index, config })
    }

    pub fn index(&self) -> &ForecastIndex {
        &self.index
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Finds the nearest forecast of `model`/`variable` valid within the
    /// temporal tolerance of `obs_time` and within the spatial tolerance of
    /// the observation.
    ///
    /// Candidates are scanned in valid-time order; on equal distance the
    /// first one scanned wins. Returns `None` when nothing qualifies. A
    /// window reaching past the representable time range is clamped to it.
    pub fn find_match(
        &self,
        obs_lat: f64,
        obs_lon: f64,
        obs_time: DateTime<Utc>,
        variable: &str,
        model: &str,
    ) -> Option<Candidate<'_>> {
        let window = self.config.temporal_window();
        let spatial = self.config.spatial_threshold_km();

        let mut best: Option<Candidate<'_>> = None;
        let mut best_distance = f64::INFINITY;

        for fp in self
            .index
            .window(
                model,
                variable,
                obs_time
                    .checked_sub_signed(window)
                    .unwrap_or(DateTime::<Utc>::MIN_UTC),
                obs_time
                    .checked_add_signed(window)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            )
        {
            let distance = haversine_km(obs_lat, obs_lon, fp.lat, fp.lon);
            if distance <= spatial && distance < best_distance {
                best_distance = distance;
                best = Some(Candidate {
                    forecast: fp,
                    distance_km: distance,
                    time_diff_hours: hours_between(fp.valid_time, obs_time),
                });
            }
        }

        best
    }

    /// Matches an observation whose value already passed QC.
    ///
    /// `variable` is the canonical name to search under, which may differ
    /// from the observation's own name when an alias was resolved.
    pub fn match_observation<'a>(
        &'a self,
        observation: &'a Observation,
        observed_value: f64,
        variable: &str,
        model: &str,
    ) -> Option<MatchedPair<'a>> {
        self.find_match(
            observation.lat,
            observation.lon,
            observation.obs_time,
            variable,
            model,
        )
        .map(|c| MatchedPair::new(observation, observed_value, c))
    }
}

fn hours_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    ((a - b).num_milliseconds() as f64 / 3_600_000.0).abs()
}
