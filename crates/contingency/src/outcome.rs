//! Contingency outcomes for a single forecast/observation pair.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContingencyError;
use crate::operator::Operator;

/// One cell of the 2×2 contingency table.
///
/// A [`Outcome::Miss`] (event happened, no warning) is the operationally
/// worst result; a [`Outcome::FalseAlarm`] is costly but safe. They are kept
/// apart rather than folded into a single "wrong" bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Forecast and observation both cross the threshold.
    Hit,
    /// Only the observation crosses the threshold.
    Miss,
    /// Only the forecast crosses the threshold.
    FalseAlarm,
    /// Neither crosses the threshold.
    CorrectNegative,
}

impl Outcome {
    /// All four outcomes in table order.
    pub const ALL: [Outcome; 4] = [
        Outcome::Hit,
        Outcome::Miss,
        Outcome::FalseAlarm,
        Outcome::CorrectNegative,
    ];

    /// Maps a (forecast crosses, observed crosses) pair to its table cell.
    pub fn from_crossings(forecast_crosses: bool, observed_crosses: bool) -> Self {
        match (forecast_crosses, observed_crosses) {
            (true, true) => Self::Hit,
            (false, true) => Self::Miss,
            (true, false) => Self::FalseAlarm,
            (false, false) => Self::CorrectNegative,
        }
    }

    /// Stable label used in persisted records.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::FalseAlarm => "false_alarm",
            Self::CorrectNegative => "correct_negative",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Outcome {
    type Err = ContingencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.label() == s)
            .ok_or_else(|| ContingencyError::UnknownOutcome {
                label: s.to_string(),
            })
    }
}

/// Result of classifying one pair against one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOutcome {
    /// Threshold value the pair was tested against.
    pub threshold: f64,
    /// Operator applied to both values.
    pub operator: Operator,
    /// Whether the forecast value crosses the threshold.
    pub forecast_crosses: bool,
    /// Whether the observed value crosses the threshold.
    pub observed_crosses: bool,
    /// Contingency cell.
    pub outcome: Outcome,
}

/// Classifies a forecast/observation pair against a single threshold.
pub fn classify(forecast: f64, observed: f64, threshold: f64, operator: Operator) -> ThresholdOutcome {
    let forecast_crosses = operator.crosses(forecast, threshold);
    let observed_crosses = operator.crosses(observed, threshold);
    ThresholdOutcome {
        threshold,
        operator,
        forecast_crosses,
        observed_crosses,
        outcome: Outcome::from_crossings(forecast_crosses, observed_crosses),
    }
}
