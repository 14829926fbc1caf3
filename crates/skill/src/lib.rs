//! Skill summaries over persisted verification history.
//!
//! A skill query names a model and a trailing window. Verified pairs in the
//! window are grouped and reduced again on every call:
//!
//! | Key | Source |
//! |-----|--------|
//! | window date | UTC date of the pair's valid time |
//! | variable | canonical variable name |
//! | lead time | whole hours, valid minus init |
//! | threshold (optional) | stored threshold outcomes of the pair |
//!
//! Each group carries MAE/RMSE/Bias, and when split by threshold, its
//! contingency counts and decision scores. Output is ordered by window date
//! (newest first), then variable, lead time and threshold.

mod aggregate;
mod error;
mod query;

use std::path::Path;

use tracing::info;
use vericast_records::{History, read_history};

pub use aggregate::SkillSummary;
pub use error::SkillError;
pub use query::SkillQuery;

/// Builds skill summaries from an in-memory history.
///
/// # Errors
///
/// Returns [`SkillError::InvalidQuery`] or [`SkillError::InvalidLookback`]
/// if the query is invalid.
pub fn aggregate(history: &History, query: &SkillQuery) -> Result<Vec<SkillSummary>, SkillError> {
    query.validate()?;
    let rows = aggregate::summarise(history, query);
    info!(
        model = %query.model(),
        start = %query.start(),
        end = %query.end(),
        summaries = rows.len(),
        "skill aggregation complete"
    );
    Ok(rows)
}

/// Reads the history directory at `dir` and builds skill summaries from it.
///
/// # Errors
///
/// Returns [`SkillError::History`] if the history cannot be read, plus the
/// errors of [`aggregate`].
pub fn aggregate_dir(dir: &Path, query: &SkillQuery) -> Result<Vec<SkillSummary>, SkillError> {
    query.validate()?;
    let history = read_history(dir)?;
    aggregate(&history, query)
}

/// Serialize skill summaries to a JSON string.
pub fn to_json(summaries: &[SkillSummary]) -> Result<String, SkillError> {
    serde_json::to_string_pretty(summaries).map_err(|e| SkillError::Serialization {
        reason: e.to_string(),
    })
}
