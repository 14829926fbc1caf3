//! Typed, name-based column access for record batches.
//!
//! Files come from ingestion collaborators, so columns are looked up by name
//! and downcast with a checked cast instead of trusting column positions.

use arrow::array::{
    Array, AsArray, BooleanArray, Float64Array, Int64Array, RecordBatch, StringArray,
    TimestampMicrosecondArray, UInt64Array,
};
use arrow::datatypes::{Float64Type, Int64Type, TimestampMicrosecondType, UInt64Type};
use chrono::{DateTime, Utc};

use crate::error::RecordsError;

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a dyn Array, RecordsError> {
    batch
        .column_by_name(name)
        .map(|c| c.as_ref())
        .ok_or_else(|| RecordsError::MissingColumn {
            column: name.to_string(),
        })
}

fn type_error(name: &str, expected: &'static str, array: &dyn Array) -> RecordsError {
    RecordsError::ColumnType {
        column: name.to_string(),
        expected,
        found: array.data_type().to_string(),
    }
}

pub(crate) fn f64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Float64Array, RecordsError> {
    let c = column(batch, name)?;
    c.as_primitive_opt::<Float64Type>()
        .ok_or_else(|| type_error(name, "Float64", c))
}

pub(crate) fn i64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Int64Array, RecordsError> {
    let c = column(batch, name)?;
    c.as_primitive_opt::<Int64Type>()
        .ok_or_else(|| type_error(name, "Int64", c))
}

pub(crate) fn u64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a UInt64Array, RecordsError> {
    let c = column(batch, name)?;
    c.as_primitive_opt::<UInt64Type>()
        .ok_or_else(|| type_error(name, "UInt64", c))
}

pub(crate) fn str_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a StringArray, RecordsError> {
    let c = column(batch, name)?;
    c.as_string_opt::<i32>()
        .ok_or_else(|| type_error(name, "Utf8", c))
}

pub(crate) fn bool_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a BooleanArray, RecordsError> {
    let c = column(batch, name)?;
    c.as_boolean_opt()
        .ok_or_else(|| type_error(name, "Boolean", c))
}

pub(crate) fn time_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a TimestampMicrosecondArray, RecordsError> {
    let c = column(batch, name)?;
    c.as_primitive_opt::<TimestampMicrosecondType>()
        .ok_or_else(|| type_error(name, "Timestamp(Microsecond)", c))
}

/// True if any of `arrays` is null at `row`.
pub(crate) fn any_null(arrays: &[&dyn Array], row: usize) -> bool {
    arrays.iter().any(|a| a.is_null(row))
}

/// Converts microseconds since the Unix epoch to a UTC timestamp.
pub(crate) fn utc_from_micros(us: i64) -> Result<DateTime<Utc>, RecordsError> {
    DateTime::from_timestamp_micros(us).ok_or_else(|| RecordsError::InvalidTime {
        reason: format!("{us} microseconds is out of range"),
    })
}
