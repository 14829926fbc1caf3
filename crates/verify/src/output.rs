//! Verification report and its JSON form.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use vericast_contingency::{ContingencyCounts, DecisionScores, Operator, ThresholdTable};
use vericast_stats::ErrorSummary;

use crate::batch::BatchTally;
use crate::error::VerifyError;

/// Outcome of one verification run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub model: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Observations inside the window and variable filter.
    pub observations_considered: usize,
    pub pairs_verified: usize,
    pub qc_rejected: usize,
    pub unmatched: usize,
    pub persisted: usize,
    pub persist_failures: usize,
    pub dry_run: bool,
    /// variable -> MAE / RMSE / Bias / pairs
    pub statistical_summary: BTreeMap<String, ErrorSummary>,
    pub decision_summary: Vec<DecisionSummary>,
}

/// Contingency table and scores for one variable at one threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionSummary {
    pub variable: String,
    pub threshold: f64,
    pub operator: Operator,
    pub counts: ContingencyCounts,
    pub scores: DecisionScores,
}

/// Decision summaries in variable order, thresholds in configured order.
pub(crate) fn decision_summaries(
    tally: &BatchTally,
    thresholds: &ThresholdTable,
) -> Vec<DecisionSummary> {
    let mut out = Vec::new();
    for (variable, counts) in &tally.contingency {
        let Some(set) = thresholds.get(variable) else {
            continue;
        };
        for (&threshold, c) in set.values().iter().zip(counts) {
            out.push(DecisionSummary {
                variable: variable.clone(),
                threshold,
                operator: set.operator(),
                counts: *c,
                scores: c.scores(),
            });
        }
    }
    out
}

/// Per-variable error summaries.
pub(crate) fn statistical_summary(tally: &BatchTally) -> BTreeMap<String, ErrorSummary> {
    tally
        .errors
        .iter()
        .map(|(variable, acc)| (variable.clone(), acc.summary()))
        .collect()
}

/// Serialize a verification report to a JSON string.
pub fn to_json(report: &VerificationReport) -> Result<String, VerifyError> {
    serde_json::to_string_pretty(report).map_err(|e| VerifyError::Serialization {
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use vericast_contingency::ThresholdSet;

    use super::*;

    fn tally() -> BatchTally {
        let mut t = BatchTally::default();
        t.contingency.insert(
            "wind_speed_10m".to_string(),
            vec![
                ContingencyCounts::new(3, 1, 1, 5),
                ContingencyCounts::new(1, 1, 0, 8),
            ],
        );
        t.contingency.insert(
            "visibility".to_string(),
            vec![ContingencyCounts::new(1, 0, 0, 0)],
        );
        t
    }

    #[test]
    fn test_decision_summaries_follow_threshold_order() {
        let table = ThresholdTable::empty().with_set(
            "wind_speed_10m",
            ThresholdSet::new(Operator::Ge, vec![12.86, 17.49]),
        );
        let rows = decision_summaries(&tally(), &table);
        // visibility has no threshold set and is skipped.
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].threshold, 12.86);
        assert_eq!(rows[1].threshold, 17.49);
        assert_eq!(rows[0].operator, Operator::Ge);
        assert_eq!(rows[0].scores.csi, 0.6);
    }

    #[test]
    fn test_to_json_fields() {
        let report = VerificationReport {
            model: "GFS".to_string(),
            start: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap(),
            observations_considered: 4,
            pairs_verified: 2,
            qc_rejected: 1,
            unmatched: 1,
            persisted: 2,
            persist_failures: 0,
            dry_run: false,
            statistical_summary: BTreeMap::new(),
            decision_summary: decision_summaries(
                &tally(),
                &ThresholdTable::default(),
            ),
        };
        let json = to_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["model"], "GFS");
        assert_eq!(value["pairs_verified"], 2);
        assert_eq!(value["decision_summary"][0]["operator"], ">");
        assert_eq!(value["decision_summary"][0]["counts"]["hits"], 3);
        assert_eq!(value["start"], "2024-01-15T00:00:00Z");
    }
}
