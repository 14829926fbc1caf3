//! Error types for the vericast-contingency crate.

/// Error type for all fallible operations in the vericast-contingency crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContingencyError {
    /// Returned when an operator symbol cannot be parsed.
    #[error("unknown comparison operator {symbol:?} (expected >, >=, < or <=)")]
    UnknownOperator {
        /// The unrecognised symbol.
        symbol: String,
    },

    /// Returned when an outcome label cannot be parsed.
    #[error("unknown outcome label {label:?}")]
    UnknownOutcome {
        /// The unrecognised label.
        label: String,
    },

    /// Returned when a threshold set contains no thresholds.
    #[error("threshold set for '{variable}' is empty")]
    EmptyThresholds {
        /// Variable the set belongs to.
        variable: String,
    },

    /// Returned when a threshold is NaN or infinite.
    #[error("threshold for '{variable}' must be finite, got {value}")]
    NonFiniteThreshold {
        /// Variable the set belongs to.
        variable: String,
        /// The offending threshold.
        value: f64,
    },
}
