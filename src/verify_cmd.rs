//! Verify command: one verification batch over a trailing window.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{info, info_span, warn};

use vericast_records::{HistoryStore, MemorySink, RecordSink, read_forecasts, read_observations};
use vericast_skill::{SkillQuery, aggregate_dir};
use vericast_verify::{to_json, verify};

use crate::cli::VerifyArgs;
use crate::config::VericastConfig;
use crate::{convert, report};

/// Trailing window of the summary printed with `--skill-summary`.
const SKILL_SUMMARY_DAYS: u32 = 7;

/// Run a verification batch and print its report.
pub fn run(args: VerifyArgs, config: &VericastConfig) -> Result<()> {
    let _cmd = info_span!("verify", model = %args.model).entered();

    let end = args.end.unwrap_or_else(Utc::now);
    let start = window_start(end, args.hours_back)?;
    let verify_cfg = convert::build_verify_config(config, &args, start, end)?;
    info!(
        spatial_km = verify_cfg.matching().spatial_threshold_km(),
        temporal_hours = verify_cfg.matching().temporal_threshold_hours(),
        %start,
        %end,
        "verifier configured"
    );

    let obs_path = input_path(args.observations.as_ref(), config.data.observations.as_ref())
        .ok_or_else(|| {
            anyhow!("no observations path: set [data].observations in config or use --observations")
        })?;
    let fc_path = input_path(args.forecasts.as_ref(), config.data.forecasts.as_ref())
        .ok_or_else(|| {
            anyhow!("no forecasts path: set [data].forecasts in config or use --forecasts")
        })?;
    let history_dir = args.history.clone().unwrap_or_else(|| config.data.history.clone());

    info!(path = %obs_path.display(), "reading observations");
    let observations = read_observations(&obs_path)
        .with_context(|| format!("failed to read observations: {}", obs_path.display()))?;
    info!(path = %fc_path.display(), "reading forecasts");
    let forecasts = read_forecasts(&fc_path)
        .with_context(|| format!("failed to read forecasts: {}", fc_path.display()))?;

    let mut sink: Box<dyn RecordSink> = if args.dry_run {
        Box::new(MemorySink::new())
    } else {
        let writer = convert::build_writer_config(&config.data)?;
        Box::new(HistoryStore::open(&history_dir, writer).with_context(|| {
            format!("failed to open history directory: {}", history_dir.display())
        })?)
    };

    let result = verify(&observations, forecasts, &verify_cfg, sink.as_mut())
        .context("verification failed")?;

    print!("{}", report::verification(&result));
    if args.show_decision_metrics {
        print!("{}", report::decision_metrics(&result));
    }
    if args.skill_summary {
        println!("\n=== {SKILL_SUMMARY_DAYS}-DAY SKILL SUMMARY ===");
        let query = SkillQuery::new(&args.model, end).with_lookback_days(SKILL_SUMMARY_DAYS);
        match aggregate_dir(&history_dir, &query) {
            Ok(rows) => print!("{}", report::skill_table(&rows)),
            Err(e) => {
                warn!(error = %e, "skill aggregation failed");
                println!("{}", report::NO_SKILL_DATA);
            }
        }
    }
    println!("\n{}", report::rule());

    if result.dry_run {
        info!("dry run complete, no results stored");
    } else {
        info!(dir = %history_dir.display(), persisted = result.persisted, "results stored");
    }

    if let Some(ref path) = args.json {
        let json = to_json(&result).context("failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    if result.persist_failures > 0 {
        bail!(
            "{} verification records were not persisted",
            result.persist_failures
        );
    }
    Ok(())
}

fn window_start(end: DateTime<Utc>, hours_back: u32) -> Result<DateTime<Utc>> {
    end.checked_sub_signed(TimeDelta::hours(i64::from(hours_back)))
        .ok_or_else(|| {
            anyhow!("--hours-back {hours_back} reaches before the earliest representable time")
        })
}

fn input_path(cli: Option<&PathBuf>, toml: Option<&PathBuf>) -> Option<PathBuf> {
    cli.or(toml).cloned()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_window_start_counts_back() {
        let end = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        let start = window_start(end, 24).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_window_start_before_time_range_rejected() {
        let end = DateTime::<Utc>::MIN_UTC + TimeDelta::hours(1);
        let err = window_start(end, 2).unwrap_err();
        assert!(err.to_string().contains("--hours-back 2"));
    }
}
