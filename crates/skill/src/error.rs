//! Skill aggregation error types.

use vericast_records::RecordsError;

/// Errors that can occur while building skill summaries.
#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    /// The query itself is unusable.
    #[error("invalid skill query: {reason}")]
    InvalidQuery { reason: String },

    /// The lookback window is zero or negative.
    #[error("lookback must be positive, got {hours} hours")]
    InvalidLookback { hours: i64 },

    /// The persisted history could not be read.
    #[error("failed to read verification history: {reason}")]
    History { reason: String },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<RecordsError> for SkillError {
    fn from(e: RecordsError) -> Self {
        SkillError::History {
            reason: e.to_string(),
        }
    }
}
