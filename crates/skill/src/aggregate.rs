//! Grouping persisted pairs into skill summaries.

use std::cmp::{Ordering, Reverse};
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;
use vericast_contingency::{ContingencyCounts, DecisionScores, Operator};
use vericast_records::{History, ThresholdRecord};
use vericast_stats::{ErrorAccumulator, ErrorSummary, PairError};

use crate::query::SkillQuery;

/// Accuracy and decision scores for one group of verified pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillSummary {
    pub model: String,
    /// UTC calendar date of the pairs' valid time.
    pub window_date: NaiveDate,
    pub variable: String,
    pub lead_time_hours: i64,
    /// `None` when the group is not split by threshold.
    pub threshold: Option<f64>,
    pub operator: Option<Operator>,
    pub stats: ErrorSummary,
    pub counts: Option<ContingencyCounts>,
    pub decision: Option<DecisionScores>,
}

#[derive(Debug, Clone, Copy)]
struct ThresholdKey {
    value: f64,
    operator: Operator,
}

impl PartialEq for ThresholdKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ThresholdKey {}

impl PartialOrd for ThresholdKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ThresholdKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then_with(|| self.operator.symbol().cmp(other.operator.symbol()))
    }
}

/// Field order is output order: newest date first, then variable, lead
/// time and threshold ascending.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey {
    date: Reverse<NaiveDate>,
    variable: String,
    lead_time_hours: i64,
    threshold: Option<ThresholdKey>,
}

#[derive(Debug, Default)]
struct Group {
    errors: ErrorAccumulator,
    counts: ContingencyCounts,
}

/// Rolls persisted verification history into skill summaries.
///
/// Selects the query model's records whose valid time lies in
/// `[end - lookback, end]` and groups them by (date, variable, lead time).
/// With threshold grouping on, each record joins the groups of its stored
/// threshold outcomes; a record without any lands in a group with no
/// threshold. Every call recomputes from scratch.
pub(crate) fn summarise(history: &History, query: &SkillQuery) -> Vec<SkillSummary> {
    let (from, to) = (query.start(), query.end());

    let mut outcomes: BTreeMap<u64, Vec<&ThresholdRecord>> = BTreeMap::new();
    if query.group_by_threshold() {
        for t in &history.thresholds {
            outcomes.entry(t.verification_id).or_default().push(t);
        }
    }

    let mut groups: BTreeMap<GroupKey, Group> = BTreeMap::new();
    let mut selected = 0usize;

    for stored in &history.verifications {
        let r = &stored.record;
        if r.model != query.model() || r.valid_time < from || r.valid_time > to {
            continue;
        }
        selected += 1;

        let error = PairError {
            error: r.error,
            absolute_error: r.absolute_error,
            squared_error: r.squared_error,
        };
        let key = |threshold: Option<ThresholdKey>| GroupKey {
            date: Reverse(r.valid_time.date_naive()),
            variable: r.variable.clone(),
            lead_time_hours: r.lead_time_hours,
            threshold,
        };

        let rows = outcomes
            .get(&stored.id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if rows.is_empty() {
            groups.entry(key(None)).or_default().errors.push(&error);
            continue;
        }
        for t in rows {
            let group = groups
                .entry(key(Some(ThresholdKey {
                    value: t.threshold_value,
                    operator: t.operator,
                })))
                .or_default();
            group.errors.push(&error);
            group.counts.record(t.outcome);
        }
    }

    debug!(
        model = %query.model(),
        selected,
        groups = groups.len(),
        "grouped verification history"
    );

    groups
        .into_iter()
        .map(|(key, group)| SkillSummary {
            model: query.model().to_string(),
            window_date: key.date.0,
            variable: key.variable,
            lead_time_hours: key.lead_time_hours,
            threshold: key.threshold.map(|t| t.value),
            operator: key.threshold.map(|t| t.operator),
            stats: group.errors.summary(),
            counts: key.threshold.map(|_| group.counts),
            decision: key.threshold.map(|_| group.counts.scores()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::{DateTime, Datelike, TimeDelta, TimeZone, Utc};
    use vericast_contingency::Outcome;
    use vericast_records::{StoredVerification, VerificationRecord};

    use super::*;

    fn t(day: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, h, 0, 0).unwrap()
    }

    fn stored(
        id: u64,
        variable: &str,
        valid: DateTime<Utc>,
        lead: i64,
        err: f64,
    ) -> StoredVerification {
        let e = PairError::score(10.0 + err, 10.0);
        StoredVerification {
            id,
            record: VerificationRecord {
                model: "GFS".to_string(),
                variable: variable.to_string(),
                station_id: format!("S{id}"),
                valid_time: valid,
                init_time: valid - TimeDelta::hours(lead),
                lead_time_hours: lead,
                obs_lat: 40.0,
                obs_lon: -70.0,
                forecast_value: 10.0 + err,
                observed_value: 10.0,
                forecast_lat: 40.0,
                forecast_lon: -70.0,
                distance_km: 0.0,
                time_diff_hours: 0.0,
                error: e.error,
                absolute_error: e.absolute_error,
                squared_error: e.squared_error,
            },
        }
    }

    fn outcome(id: u64, threshold: f64, outcome: Outcome) -> ThresholdRecord {
        ThresholdRecord {
            verification_id: id,
            threshold_value: threshold,
            operator: Operator::Gt,
            forecast_exceeds: matches!(outcome, Outcome::Hit | Outcome::FalseAlarm),
            observed_exceeds: matches!(outcome, Outcome::Hit | Outcome::Miss),
            outcome,
        }
    }

    #[test]
    fn test_order_date_desc_then_variable_then_lead() {
        let history = History {
            verifications: vec![
                stored(1, "wind_speed_10m", t(10, 6), 6, 1.0),
                stored(2, "mslp", t(10, 12), 12, 1.0),
                stored(3, "mslp", t(12, 6), 24, 1.0),
                stored(4, "mslp", t(10, 6), 6, 1.0),
            ],
            thresholds: Vec::new(),
        };
        let q = SkillQuery::new("GFS", t(20, 0));
        let rows = summarise(&history, &q);
        let keys: Vec<(u32, &str, i64)> = rows
            .iter()
            .map(|r| (r.window_date.day(), r.variable.as_str(), r.lead_time_hours))
            .collect();
        assert_eq!(
            keys,
            vec![
                (12, "mslp", 24),
                (10, "mslp", 6),
                (10, "mslp", 12),
                (10, "wind_speed_10m", 6),
            ]
        );
        assert!(rows.iter().all(|r| r.decision.is_none()));
    }

    #[test]
    fn test_threshold_groups_recompute_scores() {
        let history = History {
            verifications: vec![
                stored(1, "wind_speed_10m", t(10, 6), 6, 2.0),
                stored(2, "wind_speed_10m", t(10, 9), 6, -2.0),
            ],
            thresholds: vec![
                outcome(1, 17.49, Outcome::Hit),
                outcome(1, 12.86, Outcome::FalseAlarm),
                outcome(2, 17.49, Outcome::Miss),
                outcome(2, 12.86, Outcome::FalseAlarm),
            ],
        };
        let rows = summarise(&history, &SkillQuery::new("GFS", t(20, 0)));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].threshold, Some(12.86));
        assert_eq!(rows[1].threshold, Some(17.49));

        let gale = &rows[1];
        assert_eq!(gale.counts, Some(ContingencyCounts::new(1, 1, 0, 0)));
        let decision = gale.decision.unwrap();
        assert_relative_eq!(decision.hit_rate, 0.5);
        assert_relative_eq!(decision.csi, 0.5);
        assert_relative_eq!(gale.stats.mae, 2.0, epsilon = 1e-12);
        assert_relative_eq!(gale.stats.bias, 0.0, epsilon = 1e-12);
        assert_eq!(gale.stats.pairs, 2);
    }

    #[test]
    fn test_without_threshold_grouping_ignores_outcomes() {
        let history = History {
            verifications: vec![stored(1, "wind_speed_10m", t(10, 6), 6, 1.0)],
            thresholds: vec![outcome(1, 17.49, Outcome::Hit)],
        };
        let q = SkillQuery::new("GFS", t(20, 0)).with_group_by_threshold(false);
        let rows = summarise(&history, &q);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].threshold, None);
        assert_eq!(rows[0].counts, None);
        assert_eq!(rows[0].decision, None);
    }

    #[test]
    fn test_window_and_model_filter() {
        let mut other = stored(3, "mslp", t(15, 0), 6, 1.0);
        other.record.model = "ECMWF".to_string();
        let history = History {
            verifications: vec![
                stored(1, "mslp", t(1, 0), 6, 1.0),
                stored(2, "mslp", t(15, 0), 6, 1.0),
                other,
                stored(4, "mslp", t(25, 0), 6, 1.0),
            ],
            thresholds: Vec::new(),
        };
        let q = SkillQuery::new("GFS", t(20, 0)).with_lookback_days(7);
        let rows = summarise(&history, &q);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stats.pairs, 1);
        assert_eq!(rows[0].model, "GFS");
    }
}
