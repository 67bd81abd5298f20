//! JSONL (JSON Lines) storage.
//!
//! Each line is a valid JSON object representing one record.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use super::{StorageConfig, StorageError};

/// Record kinds, one JSONL file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Member,
    Match,
    Entry,
    Goal,
    Turnover,
    Rating,
    /// Id high-water marks of the other kinds
    Sequence,
}

impl RecordKind {
    /// Get the filename for this record kind.
    pub fn filename(&self) -> &'static str {
        match self {
            RecordKind::Member => "members.jsonl",
            RecordKind::Match => "matches.jsonl",
            RecordKind::Entry => "entries.jsonl",
            RecordKind::Goal => "goals.jsonl",
            RecordKind::Turnover => "turnovers.jsonl",
            RecordKind::Rating => "ratings.jsonl",
            RecordKind::Sequence => "sequences.jsonl",
        }
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a writer for a record kind.
    pub fn for_kind(config: &StorageConfig, kind: RecordKind) -> Self {
        Self::new(config.record_path(kind))
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single record to the file.
    pub fn append(&self, record: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(record)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended record to {:?}", self.path);
        Ok(())
    }

    /// Write `records` to a sibling temp file without touching the target.
    /// Nothing is visible until the returned [`StagedFile`] is committed.
    pub fn stage(&self, records: &[T]) -> Result<StagedFile, StorageError> {
        self.ensure_dir()?;

        let staged = StagedFile {
            tmp_path: self.path.with_extension("jsonl.tmp"),
            path: self.path.clone(),
            committed: false,
        };
        let file = File::create(&staged.tmp_path)?;
        let mut writer = BufWriter::new(file);

        for record in records {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{}", json)?;
        }
        writer.flush()?;

        debug!("Staged {} records for {:?}", records.len(), self.path);
        Ok(staged)
    }

    /// Replace the file with `records`.
    ///
    /// Writes to a sibling temp file and renames it over the target, so
    /// readers see either the old or the new contents.
    pub fn write_all(&self, records: &[T]) -> Result<usize, StorageError> {
        self.stage(records)?.commit()?;
        debug!("Wrote {} records to {:?}", records.len(), self.path);
        Ok(records.len())
    }
}

/// A fully written replacement file parked next to its target.
///
/// `commit` renames it into place. Dropping it uncommitted removes the temp
/// file and leaves the target as it was.
#[derive(Debug)]
pub struct StagedFile {
    tmp_path: PathBuf,
    path: PathBuf,
    committed: bool,
}

impl StagedFile {
    pub fn commit(mut self) -> Result<(), StorageError> {
        fs::rename(&self.tmp_path, &self.path)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = fs::remove_file(&self.tmp_path) {
                warn!("Failed to remove staged file {:?}: {}", self.tmp_path, e);
            }
        }
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Create a reader for a record kind.
    pub fn for_kind(config: &StorageConfig, kind: RecordKind) -> Self {
        Self::new(config.record_path(kind))
    }

    /// Read all records from the file. A missing file reads as empty;
    /// lines that fail to parse are skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Read records matching a predicate.
    pub fn read_where<F>(&self, predicate: F) -> Result<Vec<T>, StorageError>
    where
        F: Fn(&T) -> bool,
    {
        let all = self.read_all()?;
        Ok(all.into_iter().filter(predicate).collect())
    }
}
