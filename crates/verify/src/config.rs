//! Verification run configuration.

use chrono::{DateTime, Utc};
use vericast_contingency::ThresholdTable;
use vericast_match::MatchConfig;
use vericast_qc::QcConfig;

use crate::catalog::VariableCatalog;
use crate::error::VerifyError;

/// Configuration for one verification run.
///
/// A run covers one model and the observations whose time lies in
/// `[start, end]`.
///
/// # Example
///
/// ```
/// use chrono::{TimeDelta, Utc};
/// use vericast_verify::VerifyConfig;
///
/// let end = Utc::now();
/// let config = VerifyConfig::new("GFS", end - TimeDelta::hours(24), end)
///     .with_variable(Some("wind_speed_10m".to_string()))
///     .with_dry_run(true);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    model: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    /// Restricts the run to one variable (canonical name or alias).
    variable: Option<String>,
    matching: MatchConfig,
    qc: QcConfig,
    thresholds: ThresholdTable,
    catalog: VariableCatalog,
    dry_run: bool,
}

impl VerifyConfig {
    /// Creates a configuration with default tolerances, QC ranges,
    /// thresholds and variable catalog.
    pub fn new(model: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            model: model.into(),
            start,
            end,
            variable: None,
            matching: MatchConfig::default(),
            qc: QcConfig::default(),
            thresholds: ThresholdTable::default(),
            catalog: VariableCatalog::default(),
            dry_run: false,
        }
    }

    /// Restricts the run to one variable; `None` verifies all.
    pub fn with_variable(mut self, variable: Option<String>) -> Self {
        self.variable = variable;
        self
    }

    /// Sets the matching tolerances.
    pub fn with_matching(mut self, matching: MatchConfig) -> Self {
        self.matching = matching;
        self
    }

    /// Sets the quality-control ranges and sentinels.
    pub fn with_qc(mut self, qc: QcConfig) -> Self {
        self.qc = qc;
        self
    }

    /// Sets the per-variable decision thresholds.
    pub fn with_thresholds(mut self, thresholds: ThresholdTable) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Sets the variable catalog.
    pub fn with_catalog(mut self, catalog: VariableCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Computes everything but skips persistence.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// The variable filter, resolved to its canonical name.
    pub fn variable(&self) -> Option<&str> {
        self.variable.as_deref().map(|v| self.catalog.resolve(v))
    }

    pub fn matching(&self) -> &MatchConfig {
        &self.matching
    }

    pub fn qc(&self) -> &QcConfig {
        &self.qc
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn catalog(&self) -> &VariableCatalog {
        &self.catalog
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Validates every component of this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::InvalidWindow`] if `end < start`, or
    /// [`VerifyError::InvalidConfig`] for an empty model name or an invalid
    /// component.
    pub fn validate(&self) -> Result<(), VerifyError> {
        if self.model.trim().is_empty() {
            return Err(VerifyError::InvalidConfig {
                reason: "model name must not be empty".to_string(),
            });
        }
        if self.end < self.start {
            return Err(VerifyError::InvalidWindow {
                start: self.start,
                end: self.end,
            });
        }
        self.matching.validate()?;
        self.qc.validate()?;
        self.thresholds.validate()?;
        self.catalog.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    fn end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = VerifyConfig::new("GFS", end() - TimeDelta::hours(24), end());
        assert_eq!(config.model(), "GFS");
        assert_eq!(config.variable(), None);
        assert!(!config.dry_run());
        assert_eq!(config.matching().spatial_threshold_km(), 50.0);
        assert!(config.thresholds().get("mslp").is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_variable_alias_resolved() {
        let config = VerifyConfig::new("GFS", end(), end())
            .with_variable(Some("air_temperature".to_string()));
        assert_eq!(config.variable(), Some("temperature_2m"));
    }

    #[test]
    fn test_inverted_window_rejected() {
        let config = VerifyConfig::new("GFS", end(), end() - TimeDelta::hours(1));
        assert!(matches!(
            config.validate(),
            Err(VerifyError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_empty_model_rejected() {
        let config = VerifyConfig::new("  ", end(), end());
        assert!(matches!(
            config.validate(),
            Err(VerifyError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_invalid_component_rejected() {
        let config = VerifyConfig::new("GFS", end(), end())
            .with_matching(MatchConfig::default().with_temporal_threshold_hours(-1.0));
        assert!(matches!(
            config.validate(),
            Err(VerifyError::InvalidConfig { .. })
        ));
    }
}
