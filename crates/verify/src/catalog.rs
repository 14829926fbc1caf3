//! Canonical variable names, their units and known aliases.

use std::collections::BTreeMap;

use crate::error::VerifyError;

/// Units and aliases of one canonical variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableInfo {
    units: String,
    aliases: Vec<String>,
}

impl VariableInfo {
    pub fn new(units: impl Into<String>, aliases: Vec<String>) -> Self {
        Self {
            units: units.into(),
            aliases,
        }
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }
}

/// Maps observation variable names onto the names models use.
///
/// Names the catalog does not know pass through unchanged and are never
/// unit-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableCatalog {
    variables: BTreeMap<String, VariableInfo>,
    /// alias -> canonical name
    aliases: BTreeMap<String, String>,
}

impl Default for VariableCatalog {
    /// | Variable | Units | Aliases |
    /// |----------|-------|---------|
    /// | `temperature_2m` | K | `air_temperature`, `air_temperature_2m` |
    /// | `dewpoint_2m` | K | `dewpoint` |
    /// | `wind_speed_10m` | m/s | `wind_speed` |
    /// | `mslp` | Pa | `pressure`, `sea_level_pressure` |
    fn default() -> Self {
        let aliases =
            |names: &[&str]| -> Vec<String> { names.iter().map(|s| s.to_string()).collect() };
        Self::empty()
            .with_variable(
                "temperature_2m",
                VariableInfo::new("K", aliases(&["air_temperature", "air_temperature_2m"])),
            )
            .with_variable("dewpoint_2m", VariableInfo::new("K", aliases(&["dewpoint"])))
            .with_variable(
                "wind_speed_10m",
                VariableInfo::new("m/s", aliases(&["wind_speed"])),
            )
            .with_variable(
                "mslp",
                VariableInfo::new("Pa", aliases(&["pressure", "sea_level_pressure"])),
            )
    }
}

impl VariableCatalog {
    /// A catalog with no entries: every name passes through.
    pub fn empty() -> Self {
        Self {
            variables: BTreeMap::new(),
            aliases: BTreeMap::new(),
        }
    }

    /// Adds or replaces a canonical variable.
    pub fn with_variable(mut self, name: impl Into<String>, info: VariableInfo) -> Self {
        let name = name.into();
        if let Some(old) = self.variables.remove(&name) {
            for alias in old.aliases() {
                if self.aliases.get(alias) == Some(&name) {
                    self.aliases.remove(alias);
                }
            }
        }
        for alias in info.aliases() {
            self.aliases.insert(alias.clone(), name.clone());
        }
        self.variables.insert(name, info);
        self
    }

    /// The canonical name for `name`.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        if self.variables.contains_key(name) {
            return name;
        }
        self.aliases.get(name).map_or(name, String::as_str)
    }

    /// Expected units of a canonical variable, if catalogued.
    pub fn units(&self, canonical: &str) -> Option<&str> {
        self.variables.get(canonical).map(VariableInfo::units)
    }

    /// True unless the catalog knows `canonical` and expects other units.
    pub fn units_match(&self, canonical: &str, units: &str) -> bool {
        self.units(canonical).is_none_or(|expected| expected == units)
    }

    /// Iterates over canonical variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableInfo)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Checks that no alias shadows a canonical name.
    pub fn validate(&self) -> Result<(), VerifyError> {
        let shadowed: Vec<&str> = self
            .aliases
            .keys()
            .filter(|a| self.variables.contains_key(a.as_str()))
            .map(String::as_str)
            .collect();
        if !shadowed.is_empty() {
            return Err(VerifyError::InvalidConfig {
                reason: format!(
                    "aliases shadow canonical variables: {}",
                    shadowed.join(", ")
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_alias() {
        let c = VariableCatalog::default();
        assert_eq!(c.resolve("air_temperature"), "temperature_2m");
        assert_eq!(c.resolve("sea_level_pressure"), "mslp");
        assert_eq!(c.resolve("wind_speed_10m"), "wind_speed_10m");
    }

    #[test]
    fn test_unknown_passes_through() {
        let c = VariableCatalog::default();
        assert_eq!(c.resolve("visibility"), "visibility");
        assert!(c.units_match("visibility", "m"));
    }

    #[test]
    fn test_units_match() {
        let c = VariableCatalog::default();
        assert!(c.units_match("temperature_2m", "K"));
        assert!(!c.units_match("temperature_2m", "degC"));
        assert_eq!(c.units("mslp"), Some("Pa"));
    }

    #[test]
    fn test_replacing_variable_drops_old_aliases() {
        let c = VariableCatalog::default()
            .with_variable("mslp", VariableInfo::new("hPa", vec!["slp".to_string()]));
        assert_eq!(c.resolve("slp"), "mslp");
        assert_eq!(c.resolve("pressure"), "pressure");
        assert_eq!(c.units("mslp"), Some("hPa"));
    }

    #[test]
    fn test_shadowing_alias_rejected() {
        let c = VariableCatalog::default().with_variable(
            "dewpoint_2m",
            VariableInfo::new("K", vec!["mslp".to_string()]),
        );
        assert!(matches!(
            c.validate(),
            Err(VerifyError::InvalidConfig { .. })
        ));
        assert!(VariableCatalog::default().validate().is_ok());
    }
}
