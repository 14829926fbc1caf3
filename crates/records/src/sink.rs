//! The persistence seam between verification and storage.

use vericast_contingency::ThresholdOutcome;

use crate::error::RecordsError;
use crate::model::{History, StoredVerification, ThresholdRecord, VerificationRecord};

/// Destination for verification records and their threshold outcomes.
///
/// `write` is called once per verified pair, in order. A failed `write`
/// affects only that pair; callers keep going with the next one.
pub trait RecordSink {
    /// Stores one record with its outcomes and returns the assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`RecordsError::Validation`] when the record has non-finite
    /// numeric fields, or a storage error from the implementation.
    fn write(
        &mut self,
        record: &VerificationRecord,
        outcomes: &[ThresholdOutcome],
    ) -> Result<u64, RecordsError>;

    /// Flushes everything written so far.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the flush fails.
    fn finish(&mut self) -> Result<(), RecordsError>;
}

/// Rejects records carrying NaN or infinite values.
pub(crate) fn validate_record(record: &VerificationRecord) -> Result<(), RecordsError> {
    let bad = record.non_finite_fields();
    if bad.is_empty() {
        return Ok(());
    }
    Err(RecordsError::Validation {
        count: bad.len(),
        details: bad
            .iter()
            .map(|name| format!("{name} is not finite"))
            .collect::<Vec<_>>()
            .join("; "),
    })
}

/// Links each outcome to the verification id it belongs to.
pub(crate) fn threshold_rows(id: u64, outcomes: &[ThresholdOutcome]) -> Vec<ThresholdRecord> {
    outcomes
        .iter()
        .map(|o| ThresholdRecord::from_outcome(id, o))
        .collect()
}

/// In-memory sink, used for tests and for skill queries over a run's output.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    history: History,
    next_id: u64,
}

impl MemorySink {
    /// Creates an empty sink whose first id is 1.
    pub fn new() -> Self {
        Self {
            history: History::default(),
            next_id: 1,
        }
    }

    /// Everything written so far.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Consumes the sink and returns its contents.
    pub fn into_history(self) -> History {
        self.history
    }
}

impl RecordSink for MemorySink {
    fn write(
        &mut self,
        record: &VerificationRecord,
        outcomes: &[ThresholdOutcome],
    ) -> Result<u64, RecordsError> {
        validate_record(record)?;
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.history.verifications.push(StoredVerification {
            id,
            record: record.clone(),
        });
        self.history.thresholds.extend(threshold_rows(id, outcomes));
        Ok(id)
    }

    fn finish(&mut self) -> Result<(), RecordsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::record;
    use vericast_contingency::{Operator, classify};

    #[test]
    fn test_ids_are_sequential_from_one() {
        let mut sink = MemorySink::new();
        let r = record("GFS", "mslp");
        assert_eq!(sink.write(&r, &[]).unwrap(), 1);
        assert_eq!(sink.write(&r, &[]).unwrap(), 2);
        assert_eq!(sink.history().verifications.len(), 2);
    }

    #[test]
    fn test_default_sink_also_starts_at_one() {
        let mut sink = MemorySink::default();
        assert_eq!(sink.write(&record("GFS", "mslp"), &[]).unwrap(), 1);
    }

    #[test]
    fn test_outcomes_linked_to_id() {
        let mut sink = MemorySink::new();
        let outcomes = [
            classify(18.5, 19.2, 12.86, Operator::Gt),
            classify(18.5, 19.2, 24.69, Operator::Gt),
        ];
        sink.write(&record("GFS", "wind_speed_10m"), &[]).unwrap();
        let id = sink
            .write(&record("GFS", "wind_speed_10m"), &outcomes)
            .unwrap();
        let history = sink.into_history();
        assert_eq!(history.thresholds.len(), 2);
        assert!(history.thresholds.iter().all(|t| t.verification_id == id));
    }

    #[test]
    fn test_non_finite_record_rejected_without_consuming_id() {
        let mut sink = MemorySink::new();
        let mut bad = record("GFS", "mslp");
        bad.squared_error = f64::NAN;
        let err = sink.write(&bad, &[]).unwrap_err();
        assert!(matches!(err, RecordsError::Validation { count: 1, .. }));
        assert!(sink.history().is_empty());
        assert_eq!(sink.write(&record("GFS", "mslp"), &[]).unwrap(), 1);
    }
}
