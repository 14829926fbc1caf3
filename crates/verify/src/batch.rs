//! Per-observation screening and the mergeable batch tally.

use std::collections::BTreeMap;

use tracing::debug;
use vericast_contingency::{ContingencyCounts, ThresholdOutcome};
use vericast_match::{MatchedPair, Matcher};
use vericast_records::Observation;
use vericast_stats::ErrorAccumulator;

use crate::config::VerifyConfig;

/// A matched pair and its outcome against each configured threshold.
#[derive(Debug, Clone)]
pub(crate) struct Verified<'a> {
    pub pair: MatchedPair<'a>,
    pub outcomes: Vec<ThresholdOutcome>,
}

/// What became of one observation.
#[derive(Debug, Clone)]
pub(crate) enum Screened<'a> {
    /// Failed QC or was malformed.
    Rejected,
    /// Passed QC but no forecast was within tolerance.
    Unmatched,
    Verified(Verified<'a>),
}

fn is_malformed(obs: &Observation, canonical: &str, config: &VerifyConfig) -> bool {
    obs.is_malformed()
        || !obs.lat.is_finite()
        || !obs.lon.is_finite()
        || !config.catalog().units_match(canonical, &obs.units)
}

/// QC, match, score and classify one observation.
///
/// Reads only shared immutable state, so it is safe to run in parallel.
pub(crate) fn screen<'a>(
    obs: &'a Observation,
    matcher: &'a Matcher,
    config: &VerifyConfig,
) -> Screened<'a> {
    let variable = config.catalog().resolve(&obs.variable);

    if is_malformed(obs, variable, config) {
        debug!(station = %obs.station_id, variable, units = %obs.units, "malformed observation");
        return Screened::Rejected;
    }

    let value = match config.qc().check(obs.value, variable) {
        Ok(v) => v,
        Err(reason) => {
            debug!(station = %obs.station_id, variable, %reason, "qc rejected");
            return Screened::Rejected;
        }
    };

    let Some(pair) = matcher.match_observation(obs, value, variable, config.model()) else {
        return Screened::Unmatched;
    };

    let outcomes = config
        .thresholds()
        .get(variable)
        .map(|set| set.classify_all(pair.forecast.value, value))
        .unwrap_or_default();

    Screened::Verified(Verified { pair, outcomes })
}

/// Counts and accumulators for a batch, built per worker and merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BatchTally {
    pub qc_rejected: usize,
    pub unmatched: usize,
    pub verified: usize,
    /// Canonical variable -> error sums.
    pub errors: BTreeMap<String, ErrorAccumulator>,
    /// Canonical variable -> counts, one per configured threshold in order.
    pub contingency: BTreeMap<String, Vec<ContingencyCounts>>,
}

impl BatchTally {
    pub fn add(mut self, screened: &Screened<'_>) -> Self {
        match screened {
            Screened::Rejected => self.qc_rejected += 1,
            Screened::Unmatched => self.unmatched += 1,
            Screened::Verified(v) => {
                self.verified += 1;
                let variable = &v.pair.forecast.variable;
                self.errors
                    .entry(variable.clone())
                    .or_default()
                    .push(&v.pair.error);
                if !v.outcomes.is_empty() {
                    let counts = self
                        .contingency
                        .entry(variable.clone())
                        .or_insert_with(|| vec![ContingencyCounts::default(); v.outcomes.len()]);
                    for (c, o) in counts.iter_mut().zip(&v.outcomes) {
                        c.record(o.outcome);
                    }
                }
            }
        }
        self
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.qc_rejected += other.qc_rejected;
        self.unmatched += other.unmatched;
        self.verified += other.verified;
        for (variable, acc) in other.errors {
            self.errors.entry(variable).or_default().merge(&acc);
        }
        for (variable, counts) in other.contingency {
            let mine = self.contingency.entry(variable).or_default();
            if mine.len() < counts.len() {
                mine.resize(counts.len(), ContingencyCounts::default());
            }
            for (m, c) in mine.iter_mut().zip(&counts) {
                m.merge(c);
            }
        }
        self
    }
}
