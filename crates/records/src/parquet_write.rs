//! Low-level Parquet schema and column building.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, RecordBatch, StringArray,
    TimestampMicrosecondArray, UInt64Array,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use chrono::{DateTime, Utc};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::error::RecordsError;
use crate::model::{ForecastPoint, Observation, StoredVerification, ThresholdRecord};

fn utc_timestamp() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into()))
}

fn time_array<I>(times: I) -> ArrayRef
where
    I: Iterator<Item = DateTime<Utc>>,
{
    let micros: Vec<i64> = times.map(|t| t.timestamp_micros()).collect();
    Arc::new(TimestampMicrosecondArray::from(micros).with_timezone("UTC"))
}

fn f64_array<I: Iterator<Item = f64>>(values: I) -> ArrayRef {
    Arc::new(Float64Array::from_iter_values(values))
}

fn str_array<'a, I: Iterator<Item = &'a str>>(values: I) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(values))
}

/// Arrow schema for observation files.
pub(crate) fn observation_schema() -> Schema {
    Schema::new(vec![
        Field::new("station_id", DataType::Utf8, false),
        Field::new("obs_time", utc_timestamp(), false),
        Field::new("lat", DataType::Float64, false),
        Field::new("lon", DataType::Float64, false),
        Field::new("variable", DataType::Utf8, false),
        Field::new("value", DataType::Float64, true),
        Field::new("units", DataType::Utf8, false),
        Field::new("obs_type", DataType::Utf8, false),
    ])
}

/// Arrow schema for forecast files.
pub(crate) fn forecast_schema() -> Schema {
    Schema::new(vec![
        Field::new("model_name", DataType::Utf8, false),
        Field::new("init_time", utc_timestamp(), false),
        Field::new("valid_time", utc_timestamp(), false),
        Field::new("lat", DataType::Float64, false),
        Field::new("lon", DataType::Float64, false),
        Field::new("variable", DataType::Utf8, false),
        Field::new("value", DataType::Float64, false),
        Field::new("units", DataType::Utf8, false),
    ])
}

/// Arrow schema for persisted verification rows.
pub(crate) fn verification_schema() -> Schema {
    let mut fields = vec![
        Field::new("id", DataType::UInt64, false),
        Field::new("model_name", DataType::Utf8, false),
        Field::new("variable", DataType::Utf8, false),
        Field::new("station_id", DataType::Utf8, false),
        Field::new("valid_time", utc_timestamp(), false),
        Field::new("init_time", utc_timestamp(), false),
        Field::new("lead_time_hours", DataType::Int64, false),
    ];
    for name in VERIFICATION_F64_COLUMNS {
        fields.push(Field::new(name, DataType::Float64, false));
    }
    Schema::new(fields)
}

/// Float columns of the verification schema, in order.
pub(crate) const VERIFICATION_F64_COLUMNS: [&str; 11] = [
    "obs_lat",
    "obs_lon",
    "forecast_value",
    "observed_value",
    "forecast_lat",
    "forecast_lon",
    "distance_km",
    "time_diff_hours",
    "error",
    "absolute_error",
    "squared_error",
];

/// Arrow schema for persisted threshold-outcome rows.
pub(crate) fn threshold_schema() -> Schema {
    Schema::new(vec![
        Field::new("verification_id", DataType::UInt64, false),
        Field::new("threshold_value", DataType::Float64, false),
        Field::new("threshold_operator", DataType::Utf8, false),
        Field::new("forecast_exceeds", DataType::Boolean, false),
        Field::new("observed_exceeds", DataType::Boolean, false),
        Field::new("outcome", DataType::Utf8, false),
    ])
}

pub(crate) fn observations_to_record_batch(
    rows: &[Observation],
    schema: &Schema,
) -> Result<RecordBatch, RecordsError> {
    let value: ArrayRef = Arc::new(Float64Array::from(
        rows.iter().map(|o| o.value).collect::<Vec<_>>(),
    ));
    let columns = vec![
        str_array(rows.iter().map(|o| o.station_id.as_str())),
        time_array(rows.iter().map(|o| o.obs_time)),
        f64_array(rows.iter().map(|o| o.lat)),
        f64_array(rows.iter().map(|o| o.lon)),
        str_array(rows.iter().map(|o| o.variable.as_str())),
        value,
        str_array(rows.iter().map(|o| o.units.as_str())),
        str_array(rows.iter().map(|o| o.obs_type.as_str())),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

pub(crate) fn forecasts_to_record_batch(
    rows: &[ForecastPoint],
    schema: &Schema,
) -> Result<RecordBatch, RecordsError> {
    let columns = vec![
        str_array(rows.iter().map(|f| f.model.as_str())),
        time_array(rows.iter().map(|f| f.init_time)),
        time_array(rows.iter().map(|f| f.valid_time)),
        f64_array(rows.iter().map(|f| f.lat)),
        f64_array(rows.iter().map(|f| f.lon)),
        str_array(rows.iter().map(|f| f.variable.as_str())),
        f64_array(rows.iter().map(|f| f.value)),
        str_array(rows.iter().map(|f| f.units.as_str())),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

pub(crate) fn verifications_to_record_batch(
    rows: &[StoredVerification],
    schema: &Schema,
) -> Result<RecordBatch, RecordsError> {
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from_iter_values(rows.iter().map(|s| s.id))),
        str_array(rows.iter().map(|s| s.record.model.as_str())),
        str_array(rows.iter().map(|s| s.record.variable.as_str())),
        str_array(rows.iter().map(|s| s.record.station_id.as_str())),
        time_array(rows.iter().map(|s| s.record.valid_time)),
        time_array(rows.iter().map(|s| s.record.init_time)),
        Arc::new(Int64Array::from_iter_values(
            rows.iter().map(|s| s.record.lead_time_hours),
        )),
    ];
    let float_fields: [fn(&StoredVerification) -> f64; 11] = [
        |s| s.record.obs_lat,
        |s| s.record.obs_lon,
        |s| s.record.forecast_value,
        |s| s.record.observed_value,
        |s| s.record.forecast_lat,
        |s| s.record.forecast_lon,
        |s| s.record.distance_km,
        |s| s.record.time_diff_hours,
        |s| s.record.error,
        |s| s.record.absolute_error,
        |s| s.record.squared_error,
    ];
    for get in float_fields {
        columns.push(f64_array(rows.iter().map(get)));
    }
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

pub(crate) fn thresholds_to_record_batch(
    rows: &[ThresholdRecord],
    schema: &Schema,
) -> Result<RecordBatch, RecordsError> {
    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from_iter_values(
            rows.iter().map(|t| t.verification_id),
        )),
        f64_array(rows.iter().map(|t| t.threshold_value)),
        str_array(rows.iter().map(|t| t.operator.symbol())),
        Arc::new(BooleanArray::from(
            rows.iter().map(|t| t.forecast_exceeds).collect::<Vec<_>>(),
        )),
        Arc::new(BooleanArray::from(
            rows.iter().map(|t| t.observed_exceeds).collect::<Vec<_>>(),
        )),
        str_array(rows.iter().map(|t| t.outcome.label())),
    ];
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`RecordsError::Io`] if the file cannot be created, or
/// [`RecordsError::Parquet`] if batch writing or finalisation fails.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), RecordsError> {
    let file = std::fs::File::create(path).map_err(|e| RecordsError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;

    for batch in batches {
        writer.write(batch)?;
    }

    writer.close()?;
    Ok(())
}
