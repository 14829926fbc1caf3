//! Records for forecast verification and their Parquet persistence.
//!
//! Ingestion collaborators deliver [`Observation`] and [`ForecastPoint`]
//! files; verification produces [`VerificationRecord`]s with threshold
//! outcomes, handed to a [`RecordSink`]. [`HistoryStore`] appends them to a
//! history directory that [`read_history`] loads back for skill queries.
//!
//! # Column layout
//!
//! | File | Columns |
//! |------|---------|
//! | observations | `station_id`, `obs_time`, `lat`, `lon`, `variable`, `value` (nullable), `units`, `obs_type` |
//! | forecasts | `model_name`, `init_time`, `valid_time`, `lat`, `lon`, `variable`, `value`, `units` |
//!
//! Times are UTC microsecond timestamps.

mod columns;
pub mod error;
mod history;
pub mod model;
mod parquet_read;
mod parquet_write;
mod reader;
mod sink;
mod writer;

pub use error::RecordsError;
pub use history::{HistoryStore, read_history};
pub use model::{
    ForecastPoint, History, Observation, StoredVerification, ThresholdRecord, VerificationRecord,
};
pub use reader::{read_forecasts, read_observations};
pub use sink::{MemorySink, RecordSink};
pub use writer::{Compression, WriterConfig, write_forecasts, write_observations};
