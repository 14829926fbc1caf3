use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

/// Vericast forecast verification.
#[derive(Parser)]
#[command(
    name = "vericast",
    version,
    about = "Verify weather-model forecasts against observations"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to TOML configuration file [default: vericast.toml if present].
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Match observations to forecasts, score them and persist the results.
    Verify(VerifyArgs),
    /// Summarise persisted verification history.
    Skill(SkillArgs),
}

/// Arguments for the `verify` subcommand.
#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Model to verify (e.g. GFS).
    #[arg(long)]
    pub model: String,

    /// Length of the verification window ending at --end.
    #[arg(long, default_value_t = 24)]
    pub hours_back: u32,

    /// Verify a single variable (canonical name or alias); default all.
    #[arg(long)]
    pub variable: Option<String>,

    /// Spatial matching tolerance in km [default: 50, or [matching] in config].
    #[arg(long)]
    pub spatial_threshold: Option<f64>,

    /// Temporal matching tolerance in hours [default: 1, or [matching] in config].
    #[arg(long)]
    pub temporal_threshold: Option<f64>,

    /// Print hit rate, false alarms, CSI and the contingency table.
    #[arg(long)]
    pub show_decision_metrics: bool,

    /// Compute everything but persist nothing.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the trailing 7-day skill summary.
    #[arg(long)]
    pub skill_summary: bool,

    /// End of the window (RFC 3339); defaults to now.
    #[arg(long)]
    pub end: Option<DateTime<Utc>>,

    /// Override observations Parquet path from config.
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Override forecasts Parquet path from config.
    #[arg(long)]
    pub forecasts: Option<PathBuf>,

    /// Override history directory from config.
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Also write the verification report as JSON.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// Arguments for the `skill` subcommand.
#[derive(clap::Args)]
pub struct SkillArgs {
    /// Model to summarise.
    #[arg(long)]
    pub model: String,

    /// Trailing window in days.
    #[arg(long, default_value_t = 30)]
    pub lookback_days: u32,

    /// Group by variable and lead time only.
    #[arg(long)]
    pub no_threshold: bool,

    /// End of the window (RFC 3339); defaults to now.
    #[arg(long)]
    pub end: Option<DateTime<Utc>>,

    /// Override history directory from config.
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Write the summaries as JSON instead of printing a table.
    #[arg(long)]
    pub json: Option<PathBuf>,
}
