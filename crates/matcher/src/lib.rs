//! Spatial-temporal matching of forecasts to observations.
//!
//! For one observation, the candidate set is every forecast point of the
//! same model and variable whose valid time is within the temporal
//! tolerance of the observation time. Candidates farther than the spatial
//! tolerance are discarded; the nearest survivor wins.
//!
//! | Setting | Default | Bound |
//! |---------|---------|-------|
//! | spatial tolerance | 50 km | inclusive |
//! | temporal tolerance | 1 h | inclusive |
//!
//! Distances are haversine great-circle distances on a sphere of radius
//! [`EARTH_RADIUS_KM`].
//!
//! # Quick start
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use vericast_match::{ForecastIndex, MatchConfig, Matcher};
//! use vericast_records::ForecastPoint;
//!
//! let valid = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
//! let fp = ForecastPoint {
//!     model: "GFS".to_string(),
//!     init_time: Utc.with_ymd_and_hms(2024, 1, 15, 6, 0, 0).unwrap(),
//!     valid_time: valid,
//!     lat: 47.5,
//!     lon: -122.25,
//!     variable: "temperature_2m".to_string(),
//!     value: 284.0,
//!     units: "K".to_string(),
//! };
//! let matcher = Matcher::new(ForecastIndex::new(vec![fp]), MatchConfig::default()).unwrap();
//!
//! let hit = matcher.find_match(47.45, -122.31, valid, "temperature_2m", "GFS");
//! assert!(hit.is_some_and(|c| c.distance_km < 10.0));
//! ```

mod config;
mod distance;
mod error;
mod index;
mod matcher;

pub use config::MatchConfig;
pub use distance::{EARTH_RADIUS_KM, haversine_km};
pub use error::MatchError;
pub use index::ForecastIndex;
pub use matcher::{Candidate, MatchedPair, Matcher};
