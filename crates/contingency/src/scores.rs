//! Contingency counts and the decision scores derived from them.

use serde::{Deserialize, Serialize};

use crate::outcome::Outcome;

/// Counts of each contingency outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContingencyCounts {
    pub hits: u64,
    pub misses: u64,
    pub false_alarms: u64,
    pub correct_negatives: u64,
}

impl ContingencyCounts {
    /// Creates counts from explicit cell values.
    pub fn new(hits: u64, misses: u64, false_alarms: u64, correct_negatives: u64) -> Self {
        Self {
            hits,
            misses,
            false_alarms,
            correct_negatives,
        }
    }

    /// Adds one outcome to the table.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Hit => self.hits += 1,
            Outcome::Miss => self.misses += 1,
            Outcome::FalseAlarm => self.false_alarms += 1,
            Outcome::CorrectNegative => self.correct_negatives += 1,
        }
    }

    /// Adds another table's counts into this one.
    pub fn merge(&mut self, other: &ContingencyCounts) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.false_alarms += other.false_alarms;
        self.correct_negatives += other.correct_negatives;
    }

    /// Total number of classified pairs.
    pub fn total(&self) -> u64 {
        self.hits + self.misses + self.false_alarms + self.correct_negatives
    }

    /// Derives the decision scores for these counts.
    pub fn scores(&self) -> DecisionScores {
        DecisionScores::from_counts(self)
    }
}

/// Decision-quality scores for a contingency table.
///
/// Every ratio with a zero denominator is `0.0`, never NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionScores {
    /// Probability of detection: `hits / (hits + misses)`.
    pub hit_rate: f64,
    /// `false_alarms / (false_alarms + correct_negatives)`.
    pub false_alarm_rate: f64,
    /// `false_alarms / (false_alarms + hits)`.
    pub false_alarm_ratio: f64,
    /// `(hits + correct_negatives) / total`.
    pub accuracy: f64,
    /// Critical Success Index: `hits / (hits + misses + false_alarms)`.
    pub csi: f64,
    /// Frequency bias: `(hits + false_alarms) / (hits + misses)`.
    pub bias_score: f64,
}

impl DecisionScores {
    /// Computes all six scores from a contingency table.
    pub fn from_counts(c: &ContingencyCounts) -> Self {
        Self {
            hit_rate: ratio(c.hits, c.hits + c.misses),
            false_alarm_rate: ratio(c.false_alarms, c.false_alarms + c.correct_negatives),
            false_alarm_ratio: ratio(c.false_alarms, c.false_alarms + c.hits),
            accuracy: ratio(c.hits + c.correct_negatives, c.total()),
            csi: ratio(c.hits, c.hits + c.misses + c.false_alarms),
            bias_score: ratio(c.hits + c.false_alarms, c.hits + c.misses),
        }
    }
}

#[inline]
fn ratio(num: u64, denom: u64) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}
