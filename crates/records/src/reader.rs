//! Public entry points for reading ingestion files.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::RecordsError;
use crate::model::{ForecastPoint, Observation};
use crate::parquet_read;

/// Reads every observation row from a Parquet file.
///
/// Rows with a null required column are skipped with a warning. A null
/// `value` is kept as `None` and left to quality control.
///
/// # Errors
///
/// Returns [`RecordsError::FileNotFound`] if the file does not exist,
/// [`RecordsError::MissingColumn`] or [`RecordsError::ColumnType`] if the
/// schema does not match, or [`RecordsError::Parquet`] on decode failure.
pub fn read_observations(path: &Path) -> Result<Vec<Observation>, RecordsError> {
    let batches = parquet_read::read_batches(path)?;
    let (rows, skipped) = parquet_read::observations_from_batches(&batches)?;
    if skipped > 0 {
        warn!(path = %path.display(), skipped, "skipped observation rows with null fields");
    }
    debug!(path = %path.display(), rows = rows.len(), "read observations");
    Ok(rows)
}

/// Reads every forecast row from a Parquet file.
///
/// # Errors
///
/// Same conditions as [`read_observations`].
pub fn read_forecasts(path: &Path) -> Result<Vec<ForecastPoint>, RecordsError> {
    let batches = parquet_read::read_batches(path)?;
    let (rows, skipped) = parquet_read::forecasts_from_batches(&batches)?;
    if skipped > 0 {
        warn!(path = %path.display(), skipped, "skipped forecast rows with null fields");
    }
    debug!(path = %path.display(), rows = rows.len(), "read forecasts");
    Ok(rows)
}
