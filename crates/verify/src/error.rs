//! Verification error types.

use chrono::{DateTime, Utc};
use vericast_contingency::ContingencyError;
use vericast_match::MatchError;
use vericast_qc::QcError;

/// Errors that can occur while running a verification batch.
///
/// Per-observation problems (QC rejection, no match, a failed record write)
/// are counted in the report, not raised.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// A configuration check failed.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The verification window ends before it starts.
    #[error("window end {end} is before start {start}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<MatchError> for VerifyError {
    fn from(e: MatchError) -> Self {
        VerifyError::InvalidConfig {
            reason: e.to_string(),
        }
    }
}

impl From<QcError> for VerifyError {
    fn from(e: QcError) -> Self {
        VerifyError::InvalidConfig {
            reason: e.to_string(),
        }
    }
}

impl From<ContingencyError> for VerifyError {
    fn from(e: ContingencyError) -> Self {
        VerifyError::InvalidConfig {
            reason: e.to_string(),
        }
    }
}
