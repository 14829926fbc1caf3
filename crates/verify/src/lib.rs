//! Forecast verification batches.
//!
//! One run verifies one model over a time window:
//!
//! ```text
//! verify()
//!   ├─ select observations in [start, end] (and the variable filter)
//!   ├─ index forecasts of the model valid in [start - tol, end + tol]
//!   ├─ screen() per observation, in parallel      (batch.rs)
//!   │    ├─ resolve variable alias, unit check
//!   │    ├─ QC
//!   │    ├─ nearest-forecast match
//!   │    └─ score + classify against thresholds
//!   ├─ fold/reduce BatchTally across workers      (barrier)
//!   ├─ persist verified pairs in order, isolating failures
//!   └─ VerificationReport                          (output.rs)
//! ```
//!
//! A record that fails to persist is logged and counted; the batch carries
//! on. If the final flush of the sink fails, every record of the run counts
//! as a failure and the report is still returned.

mod batch;
mod catalog;
mod config;
mod error;
mod output;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::{info, warn};
use vericast_match::{ForecastIndex, Matcher};
use vericast_records::{ForecastPoint, Observation, RecordSink};

use crate::batch::{BatchTally, Screened};

pub use catalog::{VariableCatalog, VariableInfo};
pub use config::VerifyConfig;
pub use error::VerifyError;
pub use output::{DecisionSummary, VerificationReport, to_json};

/// Runs one verification batch.
///
/// `forecasts` may hold other models and times; only points relevant to
/// the run are indexed. Unless the configuration is a dry run, every
/// verified pair is written to `sink` in observation order and the sink is
/// flushed at the end.
///
/// # Errors
///
/// Returns [`VerifyError::InvalidConfig`] or [`VerifyError::InvalidWindow`]
/// if the configuration is invalid. Persistence failures never abort the
/// run; they are counted in [`VerificationReport::persist_failures`].
pub fn verify(
    observations: &[Observation],
    forecasts: Vec<ForecastPoint>,
    config: &VerifyConfig,
    sink: &mut dyn RecordSink,
) -> Result<VerificationReport, VerifyError> {
    config.validate()?;

    let matcher = Matcher::new(index_forecasts(forecasts, config), config.matching().clone())?;
    if matcher.index().dropped() > 0 {
        warn!(
            dropped = matcher.index().dropped(),
            "dropped malformed forecast points"
        );
    }

    let considered: Vec<&Observation> = observations
        .iter()
        .filter(|o| o.obs_time >= config.start() && o.obs_time <= config.end())
        .filter(|o| {
            config
                .variable()
                .is_none_or(|v| config.catalog().resolve(&o.variable) == v)
        })
        .collect();

    info!(
        model = %config.model(),
        observations = considered.len(),
        forecasts = matcher.index().len(),
        "verifying"
    );

    let screened: Vec<Screened<'_>> = considered
        .par_iter()
        .map(|obs| batch::screen(obs, &matcher, config))
        .collect();

    let tally = screened
        .par_iter()
        .fold(BatchTally::default, BatchTally::add)
        .reduce(BatchTally::default, BatchTally::merge);

    let (persisted, persist_failures) = if config.dry_run() {
        warn!("dry run: results not persisted");
        (0, 0)
    } else {
        persist(&screened, sink)
    };

    info!(
        pairs = tally.verified,
        qc_rejected = tally.qc_rejected,
        unmatched = tally.unmatched,
        persisted,
        persist_failures,
        "verification complete"
    );

    Ok(VerificationReport {
        model: config.model().to_string(),
        start: config.start(),
        end: config.end(),
        observations_considered: considered.len(),
        pairs_verified: tally.verified,
        qc_rejected: tally.qc_rejected,
        unmatched: tally.unmatched,
        persisted,
        persist_failures,
        dry_run: config.dry_run(),
        statistical_summary: output::statistical_summary(&tally),
        decision_summary: output::decision_summaries(&tally, config.thresholds()),
    })
}

/// Keeps the run's model and time span, canonicalises variable names and
/// drops points whose units disagree with the catalog.
fn index_forecasts(forecasts: Vec<ForecastPoint>, config: &VerifyConfig) -> ForecastIndex {
    let window = config.matching().temporal_window();
    let from = config
        .start()
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let to = config
        .end()
        .checked_add_signed(window)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    let catalog = config.catalog();
    let mut unit_mismatches = 0usize;

    let index = ForecastIndex::new(
        forecasts
            .into_iter()
            .filter(|fp| fp.model == config.model() && fp.valid_time >= from && fp.valid_time <= to)
            .map(|mut fp| {
                let canonical = catalog.resolve(&fp.variable);
                if canonical != fp.variable {
                    fp.variable = canonical.to_string();
                }
                fp
            })
            .filter(|fp| {
                let ok = catalog.units_match(&fp.variable, &fp.units);
                if !ok {
                    unit_mismatches += 1;
                }
                ok
            }),
    );

    if unit_mismatches > 0 {
        warn!(
            dropped = unit_mismatches,
            "dropped forecast points with unexpected units"
        );
    }
    index
}

/// Writes verified pairs in order and flushes the sink.
/// Returns (persisted, failures).
fn persist(screened: &[Screened<'_>], sink: &mut dyn RecordSink) -> (usize, usize) {
    let mut persisted = 0;
    let mut failures = 0;

    for s in screened {
        let Screened::Verified(v) = s else {
            continue;
        };
        let record = v.pair.to_record();
        match sink.write(&record, &v.outcomes) {
            Ok(_) => persisted += 1,
            Err(e) => {
                warn!(
                    station = %record.station_id,
                    variable = %record.variable,
                    error = %e,
                    "failed to persist verification record"
                );
                failures += 1;
            }
        }
    }

    if let Err(e) = sink.finish() {
        warn!(
            records = persisted,
            error = %e,
            "failed to flush verification records"
        );
        return (0, failures + persisted);
    }
    (persisted, failures)
}
