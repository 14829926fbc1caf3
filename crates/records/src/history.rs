//! Verification history on disk.
//!
//! A history directory holds one pair of Parquet files per verification run:
//!
//! | File | Rows |
//! |------|------|
//! | `verification_scores-<first id>.parquet` | [`StoredVerification`] |
//! | `threshold_verification-<first id>.parquet` | [`ThresholdRecord`] |
//!
//! Ids are unique across the directory: a new store continues from the
//! largest id already present.

use std::path::{Path, PathBuf};

use parquet::file::properties::WriterProperties;
use tracing::{debug, info, warn};
use vericast_contingency::ThresholdOutcome;

use crate::error::RecordsError;
use crate::model::{History, StoredVerification, ThresholdRecord, VerificationRecord};
use crate::parquet_read;
use crate::parquet_write;
use crate::sink::{RecordSink, threshold_rows, validate_record};
use crate::writer::WriterConfig;

const SCORES_PREFIX: &str = "verification_scores-";
const THRESHOLDS_PREFIX: &str = "threshold_verification-";

/// Lists files in `dir` named `<prefix>*.parquet`, sorted by name.
fn run_files(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, RecordsError> {
    let entries = std::fs::read_dir(dir).map_err(|e| RecordsError::Io {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RecordsError::Io {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(prefix) && name.ends_with(".parquet") {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Reads the full verification history stored in `dir`.
///
/// A directory that does not exist yet holds an empty history.
///
/// # Errors
///
/// Returns [`RecordsError::Io`] if the directory cannot be listed, or any
/// decode error from the stored files.
pub fn read_history(dir: &Path) -> Result<History, RecordsError> {
    if !dir.exists() {
        debug!(dir = %dir.display(), "history directory absent");
        return Ok(History::default());
    }

    let mut history = History::default();
    let mut skipped = 0;

    for path in run_files(dir, SCORES_PREFIX)? {
        let batches = parquet_read::read_batches(&path)?;
        let (rows, n) = parquet_read::verifications_from_batches(&batches)?;
        history.verifications.extend(rows);
        skipped += n;
    }
    for path in run_files(dir, THRESHOLDS_PREFIX)? {
        let batches = parquet_read::read_batches(&path)?;
        let (rows, n) = parquet_read::thresholds_from_batches(&batches)?;
        history.thresholds.extend(rows);
        skipped += n;
    }

    if skipped > 0 {
        warn!(dir = %dir.display(), skipped, "skipped history rows with null fields");
    }
    debug!(
        dir = %dir.display(),
        verifications = history.verifications.len(),
        thresholds = history.thresholds.len(),
        "read history"
    );
    Ok(history)
}

/// A [`RecordSink`] that appends one run's records to a history directory.
///
/// Records are buffered by `write` and land on disk in `finish`.
#[derive(Debug)]
pub struct HistoryStore {
    dir: PathBuf,
    config: WriterConfig,
    next_id: u64,
    verifications: Vec<StoredVerification>,
    thresholds: Vec<ThresholdRecord>,
}

impl HistoryStore {
    /// Opens (creating if needed) a history directory.
    ///
    /// # Errors
    ///
    /// Returns [`RecordsError::Validation`] for an invalid writer config,
    /// [`RecordsError::Io`] if the directory cannot be created, or any error
    /// from reading the existing history.
    pub fn open(dir: &Path, config: WriterConfig) -> Result<Self, RecordsError> {
        config.validate()?;
        std::fs::create_dir_all(dir).map_err(|e| RecordsError::Io {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;

        let existing = read_history(dir)?;
        let next_id = existing
            .verifications
            .iter()
            .map(|v| v.id)
            .max()
            .map_or(1, |max| max + 1);
        debug!(dir = %dir.display(), next_id, "opened history store");

        Ok(Self {
            dir: dir.to_path_buf(),
            config,
            next_id,
            verifications: Vec::new(),
            thresholds: Vec::new(),
        })
    }

    /// Id the next successful `write` will assign.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Number of records buffered and not yet flushed.
    pub fn pending(&self) -> usize {
        self.verifications.len()
    }
}

impl RecordSink for HistoryStore {
    fn write(
        &mut self,
        record: &VerificationRecord,
        outcomes: &[ThresholdOutcome],
    ) -> Result<u64, RecordsError> {
        validate_record(record)?;
        let id = self.next_id;
        self.next_id += 1;
        self.verifications.push(StoredVerification {
            id,
            record: record.clone(),
        });
        self.thresholds.extend(threshold_rows(id, outcomes));
        Ok(id)
    }

    /// Writes the buffered run as two files, all or nothing.
    ///
    /// Both files are staged under temporary names and renamed into place,
    /// thresholds first. On failure nothing of the run is left in the
    /// directory and the records stay buffered.
    fn finish(&mut self) -> Result<(), RecordsError> {
        let Some(first) = self.verifications.first().map(|v| v.id) else {
            return Ok(());
        };
        let props = self.config.properties()?;

        let scores_path = self.dir.join(format!("{SCORES_PREFIX}{first:012}.parquet"));
        let thresholds_path = self
            .dir
            .join(format!("{THRESHOLDS_PREFIX}{first:012}.parquet"));
        let scores_tmp = staging_path(&scores_path);
        let thresholds_tmp = staging_path(&thresholds_path);

        let result = self
            .stage(&scores_tmp, &thresholds_tmp, props)
            .and_then(|()| rename(&thresholds_tmp, &thresholds_path))
            .and_then(|()| {
                rename(&scores_tmp, &scores_path).inspect_err(|_| remove_quietly(&thresholds_path))
            });
        if let Err(e) = result {
            remove_quietly(&scores_tmp);
            remove_quietly(&thresholds_tmp);
            return Err(e);
        }

        info!(
            path = %scores_path.display(),
            verifications = self.verifications.len(),
            thresholds = self.thresholds.len(),
            "persisted verification run"
        );
        self.verifications.clear();
        self.thresholds.clear();
        Ok(())
    }
}

impl HistoryStore {
    fn stage(
        &self,
        scores: &Path,
        thresholds: &Path,
        props: WriterProperties,
    ) -> Result<(), RecordsError> {
        let schema = parquet_write::verification_schema();
        let batch = parquet_write::verifications_to_record_batch(&self.verifications, &schema)?;
        parquet_write::write_batches(scores, &[batch], &schema, props.clone())?;

        let schema = parquet_write::threshold_schema();
        let batch = parquet_write::thresholds_to_record_batch(&self.thresholds, &schema)?;
        parquet_write::write_batches(thresholds, &[batch], &schema, props)
    }
}

/// `x.parquet` -> `x.parquet.tmp`, which directory listings ignore.
fn staging_path(path: &Path) -> PathBuf {
    path.with_extension("parquet.tmp")
}

fn rename(from: &Path, to: &Path) -> Result<(), RecordsError> {
    std::fs::rename(from, to).map_err(|e| RecordsError::Io {
        path: to.to_path_buf(),
        reason: e.to_string(),
    })
}

fn remove_quietly(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove staged file");
        }
    }
}
