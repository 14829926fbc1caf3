//! Threshold classification and contingency-table decision scores.
//!
//! Each matched forecast/observation pair is tested against a variable's
//! operational thresholds. The forecast and the observation are compared to
//! the threshold with the same [`Operator`], and the two booleans land in one
//! cell of a 2×2 contingency table:
//!
//! | forecast crosses | observed crosses | outcome |
//! |------------------|------------------|---------|
//! | yes | yes | [`Outcome::Hit`] |
//! | no  | yes | [`Outcome::Miss`] |
//! | yes | no  | [`Outcome::FalseAlarm`] |
//! | no  | no  | [`Outcome::CorrectNegative`] |
//!
//! Counts accumulated over many pairs are reduced to [`DecisionScores`].
//! Every score whose denominator is zero is reported as `0.0`.
//!
//! # Quick start
//!
//! ```
//! use vericast_contingency::{ContingencyCounts, Operator, Outcome, classify};
//!
//! // Gale warning: forecast 18.5 m/s, observed 19.2 m/s.
//! let result = classify(18.5, 19.2, 17.49, Operator::Gt);
//! assert_eq!(result.outcome, Outcome::Hit);
//!
//! let mut counts = ContingencyCounts::default();
//! counts.record(result.outcome);
//! assert_eq!(counts.scores().csi, 1.0);
//! ```

pub mod error;
pub mod operator;
pub mod outcome;
pub mod scores;
pub mod table;

pub use error::ContingencyError;
pub use operator::Operator;
pub use outcome::{Outcome, ThresholdOutcome, classify};
pub use scores::{ContingencyCounts, DecisionScores};
pub use table::{ThresholdSet, ThresholdTable};
