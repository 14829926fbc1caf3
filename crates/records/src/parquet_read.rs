//! Low-level Parquet reading and row extraction.
//!
//! Each `*_from_batches` function returns the decoded rows together with the
//! number of rows skipped because a required column was null.

use std::path::Path;

use arrow::array::{Array, RecordBatch};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use vericast_contingency::{ContingencyError, Operator, Outcome};

use crate::columns::{
    any_null, bool_column, f64_column, i64_column, str_column, time_column, u64_column,
    utc_from_micros,
};
use crate::error::RecordsError;
use crate::model::{
    ForecastPoint, Observation, StoredVerification, ThresholdRecord, VerificationRecord,
};
use crate::parquet_write::VERIFICATION_F64_COLUMNS;

/// Decoded rows plus the count of rows dropped for null required fields.
pub(crate) type Decoded<T> = (Vec<T>, usize);

/// Reads all record batches from a Parquet file.
///
/// # Errors
///
/// Returns [`RecordsError::FileNotFound`] if the file does not exist, or
/// [`RecordsError::Parquet`] if the file cannot be opened or read.
pub(crate) fn read_batches(path: &Path) -> Result<Vec<RecordBatch>, RecordsError> {
    if !path.exists() {
        return Err(RecordsError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| RecordsError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let batches: Vec<RecordBatch> = reader.collect::<Result<Vec<_>, _>>()?;
    Ok(batches)
}

pub(crate) fn observations_from_batches(
    batches: &[RecordBatch],
) -> Result<Decoded<Observation>, RecordsError> {
    let mut rows = Vec::new();
    let mut skipped = 0;

    for batch in batches {
        let station = str_column(batch, "station_id")?;
        let time = time_column(batch, "obs_time")?;
        let lat = f64_column(batch, "lat")?;
        let lon = f64_column(batch, "lon")?;
        let variable = str_column(batch, "variable")?;
        let value = f64_column(batch, "value")?;
        let units = str_column(batch, "units")?;
        let obs_type = str_column(batch, "obs_type")?;
        let required: [&dyn Array; 7] = [station, time, lat, lon, variable, units, obs_type];

        for row in 0..batch.num_rows() {
            if any_null(&required, row) {
                skipped += 1;
                continue;
            }
            rows.push(Observation {
                station_id: station.value(row).to_string(),
                obs_time: utc_from_micros(time.value(row))?,
                lat: lat.value(row),
                lon: lon.value(row),
                variable: variable.value(row).to_string(),
                value: value.is_valid(row).then(|| value.value(row)),
                units: units.value(row).to_string(),
                obs_type: obs_type.value(row).to_string(),
            });
        }
    }

    Ok((rows, skipped))
}

pub(crate) fn forecasts_from_batches(
    batches: &[RecordBatch],
) -> Result<Decoded<ForecastPoint>, RecordsError> {
    let mut rows = Vec::new();
    let mut skipped = 0;

    for batch in batches {
        let model = str_column(batch, "model_name")?;
        let init = time_column(batch, "init_time")?;
        let valid = time_column(batch, "valid_time")?;
        let lat = f64_column(batch, "lat")?;
        let lon = f64_column(batch, "lon")?;
        let variable = str_column(batch, "variable")?;
        let value = f64_column(batch, "value")?;
        let units = str_column(batch, "units")?;
        let required: [&dyn Array; 8] = [model, init, valid, lat, lon, variable, value, units];

        for row in 0..batch.num_rows() {
            if any_null(&required, row) {
                skipped += 1;
                continue;
            }
            rows.push(ForecastPoint {
                model: model.value(row).to_string(),
                init_time: utc_from_micros(init.value(row))?,
                valid_time: utc_from_micros(valid.value(row))?,
                lat: lat.value(row),
                lon: lon.value(row),
                variable: variable.value(row).to_string(),
                value: value.value(row),
                units: units.value(row).to_string(),
            });
        }
    }

    Ok((rows, skipped))
}

pub(crate) fn verifications_from_batches(
    batches: &[RecordBatch],
) -> Result<Decoded<StoredVerification>, RecordsError> {
    let mut rows = Vec::new();
    let mut skipped = 0;

    for batch in batches {
        let id = u64_column(batch, "id")?;
        let model = str_column(batch, "model_name")?;
        let variable = str_column(batch, "variable")?;
        let station = str_column(batch, "station_id")?;
        let valid = time_column(batch, "valid_time")?;
        let init = time_column(batch, "init_time")?;
        let lead = i64_column(batch, "lead_time_hours")?;
        let floats = VERIFICATION_F64_COLUMNS
            .iter()
            .map(|name| f64_column(batch, name))
            .collect::<Result<Vec<_>, _>>()?;

        let keys: [&dyn Array; 7] = [id, model, variable, station, valid, init, lead];
        let mut required = keys.to_vec();
        required.extend(floats.iter().map(|c| *c as &dyn Array));

        for row in 0..batch.num_rows() {
            if any_null(&required, row) {
                skipped += 1;
                continue;
            }
            let f = |i: usize| floats[i].value(row);
            rows.push(StoredVerification {
                id: id.value(row),
                record: VerificationRecord {
                    model: model.value(row).to_string(),
                    variable: variable.value(row).to_string(),
                    station_id: station.value(row).to_string(),
                    valid_time: utc_from_micros(valid.value(row))?,
                    init_time: utc_from_micros(init.value(row))?,
                    lead_time_hours: lead.value(row),
                    obs_lat: f(0),
                    obs_lon: f(1),
                    forecast_value: f(2),
                    observed_value: f(3),
                    forecast_lat: f(4),
                    forecast_lon: f(5),
                    distance_km: f(6),
                    time_diff_hours: f(7),
                    error: f(8),
                    absolute_error: f(9),
                    squared_error: f(10),
                },
            });
        }
    }

    Ok((rows, skipped))
}

fn label_error(column: &str, e: ContingencyError) -> RecordsError {
    RecordsError::InvalidLabel {
        column: column.to_string(),
        reason: e.to_string(),
    }
}

pub(crate) fn thresholds_from_batches(
    batches: &[RecordBatch],
) -> Result<Decoded<ThresholdRecord>, RecordsError> {
    let mut rows = Vec::new();
    let mut skipped = 0;

    for batch in batches {
        let id = u64_column(batch, "verification_id")?;
        let value = f64_column(batch, "threshold_value")?;
        let operator = str_column(batch, "threshold_operator")?;
        let fc = bool_column(batch, "forecast_exceeds")?;
        let ob = bool_column(batch, "observed_exceeds")?;
        let outcome = str_column(batch, "outcome")?;
        let required: [&dyn Array; 6] = [id, value, operator, fc, ob, outcome];

        for row in 0..batch.num_rows() {
            if any_null(&required, row) {
                skipped += 1;
                continue;
            }
            let op: Operator = operator
                .value(row)
                .parse()
                .map_err(|e| label_error("threshold_operator", e))?;
            let out: Outcome = outcome
                .value(row)
                .parse()
                .map_err(|e| label_error("outcome", e))?;
            rows.push(ThresholdRecord {
                verification_id: id.value(row),
                threshold_value: value.value(row),
                operator: op,
                forecast_exceeds: fc.value(row),
                observed_exceeds: ob.value(row),
                outcome: out,
            });
        }
    }

    Ok((rows, skipped))
}
