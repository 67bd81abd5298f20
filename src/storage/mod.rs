//! File-backed record store.
//!
//! Each record kind lives in its own JSONL file under `<data_dir>/records/`.
//! The [`ClubStore`] layers typed CRUD, reference checks and the match
//! cascade delete on top of the raw JSONL reader and writer. Ids come from
//! per-kind high-water marks in `sequences.jsonl` and are never reused.

pub mod jsonl;
pub mod sequence;
pub mod store;

pub use jsonl::*;
pub use sequence::*;
pub use store::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn records_dir(&self) -> PathBuf {
        self.data_dir.join("records")
    }

    /// Path of the JSONL file holding one record kind.
    pub fn record_path(&self, kind: RecordKind) -> PathBuf {
        self.records_dir().join(kind.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
