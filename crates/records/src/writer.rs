//! High-level Parquet writer configuration and orchestration.

use std::path::Path;

use parquet::file::properties::WriterProperties;
use serde::Deserialize;

use crate::error::RecordsError;
use crate::model::{ForecastPoint, Observation};
use crate::parquet_write;

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    /// Converts to the corresponding `parquet::basic::Compression` variant.
    fn to_parquet(self) -> Result<parquet::basic::Compression, RecordsError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level = parquet::basic::ZstdLevel::try_new(3)?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

/// Configuration for writing record files to Parquet.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    compression: Compression,
    /// Maximum number of rows per row group.
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of rows per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Compression algorithm in use.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RecordsError::Validation`] if `row_group_size` is zero.
    pub fn validate(&self) -> Result<(), RecordsError> {
        if self.row_group_size == 0 {
            return Err(RecordsError::Validation {
                count: 1,
                details: "row_group_size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Builds Parquet writer properties from this configuration.
    pub(crate) fn properties(&self) -> Result<WriterProperties, RecordsError> {
        self.validate()?;
        Ok(WriterProperties::builder()
            .set_compression(self.compression.to_parquet()?)
            .set_max_row_group_size(self.row_group_size)
            .build())
    }
}

/// Writes observations to a Parquet file in the ingestion layout.
///
/// # Errors
///
/// Returns [`RecordsError::Validation`] if the configuration is invalid, or
/// [`RecordsError::Parquet`] / [`RecordsError::Io`] if writing fails.
pub fn write_observations(
    path: &Path,
    rows: &[Observation],
    config: &WriterConfig,
) -> Result<(), RecordsError> {
    let props = config.properties()?;
    let schema = parquet_write::observation_schema();
    let batch = parquet_write::observations_to_record_batch(rows, &schema)?;
    parquet_write::write_batches(path, &[batch], &schema, props)
}

/// Writes forecast points to a Parquet file in the ingestion layout.
///
/// # Errors
///
/// Returns [`RecordsError::Validation`] if the configuration is invalid, or
/// [`RecordsError::Parquet`] / [`RecordsError::Io`] if writing fails.
pub fn write_forecasts(
    path: &Path,
    rows: &[ForecastPoint],
    config: &WriterConfig,
) -> Result<(), RecordsError> {
    let props = config.properties()?;
    let schema = parquet_write::forecast_schema();
    let batch = parquet_write::forecasts_to_record_batch(rows, &schema)?;
    parquet_write::write_batches(path, &[batch], &schema, props)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = WriterConfig::default();
        assert_eq!(config.compression, Compression::Snappy);
        assert_eq!(config.row_group_size, 1_000_000);
    }

    #[test]
    fn test_builder_methods() {
        let config = WriterConfig::default()
            .with_compression(Compression::Zstd)
            .with_row_group_size(500);
        assert_eq!(config.compression(), Compression::Zstd);
        assert_eq!(config.row_group_size, 500);
    }

    #[test]
    fn test_validate_zero_row_group_size() {
        let config = WriterConfig::default().with_row_group_size(0);
        assert!(matches!(
            config.validate(),
            Err(RecordsError::Validation { count: 1, .. })
        ));
    }

    #[test]
    fn test_all_compressions_convert() {
        for c in [Compression::None, Compression::Snappy, Compression::Zstd] {
            assert!(c.to_parquet().is_ok());
        }
    }
}
