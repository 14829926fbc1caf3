//! Pure conversion functions: TOML config structs -> crate API config types.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};

use crate::cli::VerifyArgs;
use crate::config::*;

use vericast_contingency::{Operator, ThresholdSet, ThresholdTable};
use vericast_match::MatchConfig;
use vericast_qc::{PlausibleRange, QcConfig};
use vericast_records::{Compression, WriterConfig};
use vericast_verify::{VariableCatalog, VariableInfo, VerifyConfig};

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Builds a [`WriterConfig`] from the TOML data configuration.
pub fn build_writer_config(data: &DataToml) -> Result<WriterConfig> {
    let compression = parse_compression(&data.compression)?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(data.row_group_size))
}

/// Builds a [`MatchConfig`]; CLI values win over the TOML ones.
pub fn build_match_config(
    matching: &MatchingToml,
    spatial_km: Option<f64>,
    temporal_hours: Option<f64>,
) -> MatchConfig {
    MatchConfig::default()
        .with_spatial_threshold_km(spatial_km.unwrap_or(matching.spatial_threshold_km))
        .with_temporal_threshold_hours(temporal_hours.unwrap_or(matching.temporal_threshold_hours))
}

/// Builds a [`QcConfig`] from the defaults plus the TOML overrides.
pub fn build_qc_config(qc: &QcToml) -> QcConfig {
    let mut cfg = QcConfig::default();
    if let Some(ref sentinels) = qc.sentinels {
        cfg = cfg.with_sentinels(sentinels.clone());
    }
    for (variable, range) in &qc.ranges {
        cfg = cfg.with_range(variable, PlausibleRange::new(range.min, range.max));
    }
    cfg
}

/// Builds a [`ThresholdTable`] from the defaults plus the TOML sets.
pub fn build_threshold_table(thresholds: &BTreeMap<String, ThresholdToml>) -> Result<ThresholdTable> {
    let mut table = ThresholdTable::default();
    for (variable, t) in thresholds {
        let operator: Operator = t
            .operator
            .parse()
            .with_context(|| format!("thresholds.{variable}"))?;
        table = table.with_set(variable, ThresholdSet::new(operator, t.values.clone()));
    }
    Ok(table)
}

/// Builds a [`VariableCatalog`] from the defaults plus the TOML entries.
pub fn build_catalog(variables: &BTreeMap<String, VariableToml>) -> VariableCatalog {
    variables
        .iter()
        .fold(VariableCatalog::default(), |catalog, (name, v)| {
            catalog.with_variable(name, VariableInfo::new(&v.units, v.aliases.clone()))
        })
}

/// Builds the [`VerifyConfig`] for one `verify` invocation.
pub fn build_verify_config(
    config: &VericastConfig,
    args: &VerifyArgs,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<VerifyConfig> {
    Ok(VerifyConfig::new(&args.model, start, end)
        .with_variable(args.variable.clone())
        .with_matching(build_match_config(
            &config.matching,
            args.spatial_threshold,
            args.temporal_threshold,
        ))
        .with_qc(build_qc_config(&config.qc))
        .with_thresholds(build_threshold_table(&config.thresholds)?)
        .with_catalog(build_catalog(&config.variables))
        .with_dry_run(args.dry_run))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compression() {
        assert_eq!(parse_compression("ZSTD").unwrap(), Compression::Zstd);
        assert!(parse_compression("lz4").is_err());
    }

    #[test]
    fn test_cli_overrides_matching() {
        let matching = MatchingToml {
            spatial_threshold_km: 25.0,
            temporal_threshold_hours: 3.0,
        };
        let cfg = build_match_config(&matching, Some(10.0), None);
        assert_eq!(cfg.spatial_threshold_km(), 10.0);
        assert_eq!(cfg.temporal_threshold_hours(), 3.0);
    }

    #[test]
    fn test_threshold_override_keeps_defaults() {
        let mut thresholds = BTreeMap::new();
        thresholds.insert(
            "temperature_2m".to_string(),
            ThresholdToml {
                operator: "<".to_string(),
                values: vec![273.15],
            },
        );
        let table = build_threshold_table(&thresholds).unwrap();
        let temp = table.get("temperature_2m").unwrap();
        assert_eq!(temp.operator(), Operator::Lt);
        assert_eq!(temp.values(), &[273.15]);
        assert!(table.get("wind_speed_10m").is_some());
    }

    #[test]
    fn test_bad_operator_rejected() {
        let mut thresholds = BTreeMap::new();
        thresholds.insert(
            "mslp".to_string(),
            ThresholdToml {
                operator: "=>".to_string(),
                values: vec![100_000.0],
            },
        );
        let err = build_threshold_table(&thresholds).unwrap_err();
        assert!(format!("{err:#}").contains("thresholds.mslp"));
    }

    #[test]
    fn test_catalog_entry_added() {
        let mut variables = BTreeMap::new();
        variables.insert(
            "visibility".to_string(),
            VariableToml {
                units: "m".to_string(),
                aliases: vec!["vis".to_string()],
            },
        );
        let catalog = build_catalog(&variables);
        assert_eq!(catalog.resolve("vis"), "visibility");
        assert_eq!(catalog.resolve("wind_speed"), "wind_speed_10m");
    }

    #[test]
    fn test_qc_overrides() {
        let mut ranges = BTreeMap::new();
        ranges.insert("visibility".to_string(), RangeToml { min: 0.0, max: 1.0e5 });
        let qc = build_qc_config(&QcToml {
            sentinels: Some(vec![9999.0]),
            ranges,
        });
        assert_eq!(qc.sentinels(), &[9999.0]);
        assert!(qc.range("visibility").is_some());
        assert!(qc.range("mslp").is_some());
    }
}
