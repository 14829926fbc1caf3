//! QC configuration error types.

/// Errors raised while validating a [`QcConfig`](crate::QcConfig).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QcError {
    /// A plausible range has a non-finite bound.
    #[error("range for '{variable}' has a non-finite bound [{min}, {max}]")]
    NonFiniteRange {
        /// Variable the range belongs to.
        variable: String,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A plausible range has `min > max`.
    #[error("range for '{variable}' is inverted: min {min} > max {max}")]
    InvertedRange {
        /// Variable the range belongs to.
        variable: String,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A sentinel value is NaN, which can never compare equal.
    #[error("sentinel values must not be NaN")]
    NanSentinel,
}
