//! Skill command: summarise persisted verification history.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, info_span};

use vericast_skill::{SkillQuery, aggregate_dir, to_json};

use crate::cli::SkillArgs;
use crate::config::VericastConfig;
use crate::report;

/// Build skill summaries and print them or write them as JSON.
pub fn run(args: SkillArgs, config: &VericastConfig) -> Result<()> {
    let _cmd = info_span!("skill", model = %args.model).entered();

    let end = args.end.unwrap_or_else(Utc::now);
    let query = SkillQuery::new(&args.model, end)
        .with_lookback_days(args.lookback_days)
        .with_group_by_threshold(!args.no_threshold);
    let history_dir = args.history.as_ref().unwrap_or(&config.data.history);

    let rows = aggregate_dir(history_dir, &query).with_context(|| {
        format!(
            "failed to aggregate skill for {} from {}",
            args.model,
            history_dir.display()
        )
    })?;

    match args.json {
        Some(ref path) => {
            let json = to_json(&rows).context("failed to serialize skill summaries")?;
            std::fs::write(path, json)
                .with_context(|| format!("failed to write skill summaries: {}", path.display()))?;
            info!(path = %path.display(), rows = rows.len(), "skill summaries written");
        }
        None => print!("{}", report::skill_table(&rows)),
    }
    Ok(())
}
