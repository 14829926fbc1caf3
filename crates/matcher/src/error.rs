//! Error types for the vericast-match crate.

/// Error type for all fallible operations in the vericast-match crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MatchError {
    /// Returned when the spatial tolerance is negative or non-finite.
    #[error("spatial threshold must be finite and non-negative, got {km} km")]
    InvalidSpatialThreshold {
        /// The invalid tolerance in kilometres.
        km: f64,
    },

    /// Returned when the temporal tolerance is negative or non-finite.
    #[error("temporal threshold must be finite and non-negative, got {hours} h")]
    InvalidTemporalThreshold {
        /// The invalid tolerance in hours.
        hours: f64,
    },
}
