//! Per-variable threshold configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ContingencyError;
use crate::operator::Operator;
use crate::outcome::{ThresholdOutcome, classify};

/// Ordered severity thresholds for one variable, sharing one operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    operator: Operator,
    values: Vec<f64>,
}

impl ThresholdSet {
    /// Creates a threshold set. Order is preserved.
    pub fn new(operator: Operator, values: Vec<f64>) -> Self {
        Self { operator, values }
    }

    /// Returns the comparison operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the thresholds in configured order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Classifies a pair against every threshold, one outcome per threshold.
    pub fn classify_all(&self, forecast: f64, observed: f64) -> Vec<ThresholdOutcome> {
        self.values
            .iter()
            .map(|&t| classify(forecast, observed, t, self.operator))
            .collect()
    }

    /// Validates that the set is non-empty and every threshold is finite.
    pub fn validate(&self, variable: &str) -> Result<(), ContingencyError> {
        if self.values.is_empty() {
            return Err(ContingencyError::EmptyThresholds {
                variable: variable.to_string(),
            });
        }
        if let Some(&value) = self.values.iter().find(|v| !v.is_finite()) {
            return Err(ContingencyError::NonFiniteThreshold {
                variable: variable.to_string(),
                value,
            });
        }
        Ok(())
    }
}

/// Threshold sets keyed by canonical variable name.
///
/// Variables without an entry produce no threshold outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable {
    sets: BTreeMap<String, ThresholdSet>,
}

impl Default for ThresholdTable {
    /// Operational thresholds (SI units).
    ///
    /// | Variable | Thresholds |
    /// |----------|------------|
    /// | `temperature_2m` | 273.15, 268.15, 283.15, 308.15 K (freezing, severe frost, comfort, heat) |
    /// | `dewpoint_2m` | 273.15 K |
    /// | `wind_speed_10m` | 12.86, 17.49, 24.69 m/s (small craft, gale, storm) |
    /// | `mslp` | 100000 Pa |
    fn default() -> Self {
        Self::empty()
            .with_set(
                "temperature_2m",
                ThresholdSet::new(Operator::Gt, vec![273.15, 268.15, 283.15, 308.15]),
            )
            .with_set("dewpoint_2m", ThresholdSet::new(Operator::Gt, vec![273.15]))
            .with_set(
                "wind_speed_10m",
                ThresholdSet::new(Operator::Gt, vec![12.86, 17.49, 24.69]),
            )
            .with_set("mslp", ThresholdSet::new(Operator::Gt, vec![100_000.0]))
    }
}

impl ThresholdTable {
    /// A table with no thresholds configured.
    pub fn empty() -> Self {
        Self {
            sets: BTreeMap::new(),
        }
    }

    /// Adds or replaces the set for `variable`.
    pub fn with_set(mut self, variable: impl Into<String>, set: ThresholdSet) -> Self {
        self.sets.insert(variable.into(), set);
        self
    }

    /// Returns the set for `variable`, if configured.
    pub fn get(&self, variable: &str) -> Option<&ThresholdSet> {
        self.sets.get(variable)
    }

    /// Iterates over (variable, set) in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThresholdSet)> {
        self.sets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Validates every set in the table.
    pub fn validate(&self) -> Result<(), ContingencyError> {
        for (variable, set) in &self.sets {
            set.validate(variable)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;

    #[test]
    fn test_classify_all_is_independent_per_threshold() {
        let set = ThresholdSet::new(Operator::Gt, vec![12.86, 17.49, 24.69]);
        let results = set.classify_all(20.0, 26.0);
        let outcomes: Vec<Outcome> = results.iter().map(|r| r.outcome).collect();
        assert_eq!(outcomes, vec![Outcome::Hit, Outcome::Hit, Outcome::Miss]);
        let thresholds: Vec<f64> = results.iter().map(|r| r.threshold).collect();
        assert_eq!(thresholds, vec![12.86, 17.49, 24.69]);
    }

    #[test]
    fn test_default_table() {
        let table = ThresholdTable::default();
        assert_eq!(table.get("temperature_2m").unwrap().values().len(), 4);
        assert_eq!(table.get("wind_speed_10m").unwrap().values()[1], 17.49);
        assert_eq!(table.get("mslp").unwrap().operator(), Operator::Gt);
        assert!(table.get("precipitation").is_none());
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_with_set_replaces() {
        let table = ThresholdTable::default()
            .with_set("mslp", ThresholdSet::new(Operator::Lt, vec![98_000.0]));
        let set = table.get("mslp").unwrap();
        assert_eq!(set.operator(), Operator::Lt);
        assert_eq!(set.values(), &[98_000.0]);
    }

    #[test]
    fn test_validate_empty_set() {
        let table = ThresholdTable::empty().with_set("mslp", ThresholdSet::new(Operator::Gt, vec![]));
        assert!(matches!(
            table.validate(),
            Err(ContingencyError::EmptyThresholds { variable }) if variable == "mslp"
        ));
    }

    #[test]
    fn test_validate_non_finite() {
        let set = ThresholdSet::new(Operator::Gt, vec![1.0, f64::NAN]);
        assert!(matches!(
            set.validate("x"),
            Err(ContingencyError::NonFiniteThreshold { .. })
        ));
    }

    #[test]
    fn test_iter_sorted_by_variable() {
        let table = ThresholdTable::default();
        let names: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            vec!["dewpoint_2m", "mslp", "temperature_2m", "wind_speed_10m"]
        );
    }
}
