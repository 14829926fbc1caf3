//! Continuous error statistics for forecast verification.
//!
//! Per pair: `error = forecast - observed`, its absolute value and its square.
//! Over a set of pairs: MAE, RMSE and Bias. Inputs must already share units.

use serde::Serialize;

/// Error terms for a single forecast/observation pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairError {
    /// `forecast - observed`.
    pub error: f64,
    /// `|error|`.
    pub absolute_error: f64,
    /// `error²`.
    pub squared_error: f64,
}

impl PairError {
    /// Scores one pair. No clamping, no unit conversion.
    #[inline]
    pub fn score(forecast: f64, observed: f64) -> Self {
        let error = forecast - observed;
        Self {
            error,
            absolute_error: error.abs(),
            squared_error: error * error,
        }
    }
}

/// Running sums of pair errors, mergeable across workers.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ErrorAccumulator {
    sum_error: f64,
    sum_absolute: f64,
    sum_squared: f64,
    n: u64,
}

impl ErrorAccumulator {
    /// Adds one pair.
    pub fn push(&mut self, e: &PairError) {
        self.sum_error += e.error;
        self.sum_absolute += e.absolute_error;
        self.sum_squared += e.squared_error;
        self.n += 1;
    }

    /// Folds another accumulator into this one.
    pub fn merge(&mut self, other: &ErrorAccumulator) {
        self.sum_error += other.sum_error;
        self.sum_absolute += other.sum_absolute;
        self.sum_squared += other.sum_squared;
        self.n += other.n;
    }

    /// Number of pairs accumulated.
    pub fn count(&self) -> u64 {
        self.n
    }

    /// MAE / RMSE / Bias over the accumulated pairs.
    ///
    /// An empty accumulator summarises to all zeros.
    pub fn summary(&self) -> ErrorSummary {
        if self.n == 0 {
            return ErrorSummary::default();
        }
        let n = self.n as f64;
        ErrorSummary {
            mae: self.sum_absolute / n,
            rmse: (self.sum_squared / n).sqrt(),
            bias: self.sum_error / n,
            pairs: self.n,
        }
    }
}

impl<'a> FromIterator<&'a PairError> for ErrorAccumulator {
    fn from_iter<I: IntoIterator<Item = &'a PairError>>(iter: I) -> Self {
        let mut acc = Self::default();
        for e in iter {
            acc.push(e);
        }
        acc
    }
}

/// Aggregate continuous accuracy metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ErrorSummary {
    /// Mean absolute error.
    pub mae: f64,
    /// Root-mean-square error.
    pub rmse: f64,
    /// Mean signed error.
    pub bias: f64,
    /// Number of pairs the metrics were computed from.
    pub pairs: u64,
}

impl ErrorSummary {
    /// Summarises a slice of pair errors.
    pub fn from_errors(errors: &[PairError]) -> Self {
        errors.iter().collect::<ErrorAccumulator>().summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_score_perfect_forecast() {
        let e = PairError::score(101_300.0, 101_300.0);
        assert_eq!(e.error, 0.0);
        assert_eq!(e.absolute_error, 0.0);
        assert_eq!(e.squared_error, 0.0);
    }

    #[test]
    fn test_score_positive_bias() {
        let e = PairError::score(101_500.0, 101_300.0);
        assert_eq!(e.error, 200.0);
        assert_eq!(e.absolute_error, 200.0);
        assert_eq!(e.squared_error, 40_000.0);
    }

    #[test]
    fn test_score_negative_bias() {
        let e = PairError::score(101_100.0, 101_300.0);
        assert_eq!(e.error, -200.0);
        assert_eq!(e.absolute_error, 200.0);
        assert_eq!(e.squared_error, 40_000.0);
    }

    #[test]
    fn test_score_cold_front() {
        let e = PairError::score(271.0, 272.5);
        assert_relative_eq!(e.absolute_error, 1.5, epsilon = 1e-9);
        assert_relative_eq!(e.error, -1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_summary_known_values() {
        // errors: +1, -1, +2, -2
        let errors: Vec<PairError> = [(11.0, 10.0), (9.0, 10.0), (12.0, 10.0), (8.0, 10.0)]
            .iter()
            .map(|&(f, o)| PairError::score(f, o))
            .collect();
        let s = ErrorSummary::from_errors(&errors);
        assert_relative_eq!(s.mae, 1.5, epsilon = 1e-12);
        assert_relative_eq!(s.rmse, 2.5_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(s.bias, 0.0, epsilon = 1e-12);
        assert_eq!(s.pairs, 4);
    }

    #[test]
    fn test_summary_empty() {
        let s = ErrorAccumulator::default().summary();
        assert_eq!(s, ErrorSummary::default());
        assert!(s.rmse.is_finite());
    }

    #[test]
    fn test_merge_equals_single_pass() {
        let errors: Vec<PairError> = (0..10)
            .map(|i| PairError::score(i as f64 * 0.7, 3.0))
            .collect();
        let whole = ErrorSummary::from_errors(&errors);

        let mut left: ErrorAccumulator = errors[..4].iter().collect();
        let right: ErrorAccumulator = errors[4..].iter().collect();
        left.merge(&right);
        let merged = left.summary();

        assert_relative_eq!(whole.mae, merged.mae, epsilon = 1e-12);
        assert_relative_eq!(whole.rmse, merged.rmse, epsilon = 1e-12);
        assert_relative_eq!(whole.bias, merged.bias, epsilon = 1e-12);
        assert_eq!(whole.pairs, merged.pairs);
    }

    #[test]
    fn test_rmse_at_least_mae() {
        let errors: Vec<PairError> = [0.5, -3.0, 1.25, 7.0]
            .iter()
            .map(|&d| PairError::score(d, 0.0))
            .collect();
        let s = ErrorSummary::from_errors(&errors);
        assert!(s.rmse >= s.mae);
    }
}
