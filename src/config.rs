use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG: &str = "vericast.toml";

/// Top-level Vericast configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VericastConfig {
    /// Input files and the history directory.
    #[serde(default)]
    pub data: DataToml,

    /// Matching tolerances.
    #[serde(default)]
    pub matching: MatchingToml,

    /// Quality-control overrides.
    #[serde(default)]
    pub qc: QcToml,

    /// Threshold sets keyed by canonical variable, added to the defaults.
    #[serde(default)]
    pub thresholds: BTreeMap<String, ThresholdToml>,

    /// Variable catalog entries keyed by canonical variable, added to the defaults.
    #[serde(default)]
    pub variables: BTreeMap<String, VariableToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataToml {
    pub observations: Option<PathBuf>,
    pub forecasts: Option<PathBuf>,
    #[serde(default = "default_history")]
    pub history: PathBuf,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for DataToml {
    fn default() -> Self {
        Self {
            observations: None,
            forecasts: None,
            history: default_history(),
            compression: default_compression(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_history() -> PathBuf {
    PathBuf::from("verification_history")
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingToml {
    #[serde(default = "default_spatial_threshold_km")]
    pub spatial_threshold_km: f64,
    #[serde(default = "default_temporal_threshold_hours")]
    pub temporal_threshold_hours: f64,
}

impl Default for MatchingToml {
    fn default() -> Self {
        Self {
            spatial_threshold_km: default_spatial_threshold_km(),
            temporal_threshold_hours: default_temporal_threshold_hours(),
        }
    }
}

fn default_spatial_threshold_km() -> f64 {
    50.0
}
fn default_temporal_threshold_hours() -> f64 {
    1.0
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QcToml {
    /// Replaces the default sentinel list when set.
    #[serde(default)]
    pub sentinels: Option<Vec<f64>>,
    #[serde(default)]
    pub ranges: BTreeMap<String, RangeToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeToml {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdToml {
    #[serde(default = "default_operator")]
    pub operator: String,
    pub values: Vec<f64>,
}

fn default_operator() -> String {
    ">".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableToml {
    pub units: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Loads the configuration.
///
/// An explicit path must exist. Without one, `vericast.toml` in the working
/// directory is used if present, otherwise every default applies.
pub fn load(path: Option<&Path>) -> Result<VericastConfig> {
    let path = match path {
        Some(p) => p,
        None if Path::new(DEFAULT_CONFIG).exists() => Path::new(DEFAULT_CONFIG),
        None => {
            debug!("no config file, using defaults");
            return Ok(VericastConfig::default());
        }
    };
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str)
        .with_context(|| format!("failed to parse TOML config: {}", path.display()))
}
