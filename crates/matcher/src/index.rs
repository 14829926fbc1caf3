//! Forecast candidates grouped for time-window lookup.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;
use vericast_records::ForecastPoint;

/// Forecast points keyed by model then variable, each list sorted by
/// valid time.
///
/// Sorting is stable, so points sharing a valid time keep their input
/// order. That order is the tie-break order of the matcher.
#[derive(Debug, Clone, Default)]
pub struct ForecastIndex {
    points: BTreeMap<String, BTreeMap<String, Vec<ForecastPoint>>>,
    len: usize,
    dropped: usize,
}

impl ForecastIndex {
    /// Builds an index, dropping malformed points (see
    /// [`ForecastPoint::is_malformed`]).
    pub fn new<I>(points: I) -> Self
    where
        I: IntoIterator<Item = ForecastPoint>,
    {
        let mut grouped: BTreeMap<String, BTreeMap<String, Vec<ForecastPoint>>> = BTreeMap::new();
        let mut len = 0;
        let mut dropped = 0;

        for fp in points {
            if fp.is_malformed() {
                dropped += 1;
                continue;
            }
            grouped
                .entry(fp.model.clone())
                .or_default()
                .entry(fp.variable.clone())
                .or_default()
                .push(fp);
            len += 1;
        }

        for by_variable in grouped.values_mut() {
            for list in by_variable.values_mut() {
                list.sort_by_key(|fp| fp.valid_time);
            }
        }

        debug!(points = len, dropped, "built forecast index");
        Self {
            points: grouped,
            len,
            dropped,
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no point was indexed.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of malformed points dropped while building.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// All points for a model and variable, sorted by valid time.
    pub fn series(&self, model: &str, variable: &str) -> &[ForecastPoint] {
        self.points
            .get(model)
            .and_then(|m| m.get(variable))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Points for a model and variable with `from <= valid_time <= to`,
    /// in index order.
    pub fn window(
        &self,
        model: &str,
        variable: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> &[ForecastPoint] {
        let series = self.series(model, variable);
        let start = series.partition_point(|fp| fp.valid_time < from);
        let end = series.partition_point(|fp| fp.valid_time <= to);
        if start >= end {
            return &[];
        }
        &series[start..end]
    }
}
