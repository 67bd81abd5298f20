//! Id high-water marks.
//!
//! One row per record kind holds the last id handed out, so an id stays
//! retired after its record is deleted.

use serde::{Deserialize, Serialize};

use super::{JsonlReader, JsonlWriter, RecordKind, StagedFile, StorageConfig, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdSequence {
    pub kind: RecordKind,
    pub last: u32,
}

/// The high-water marks of every record kind.
#[derive(Debug, Default)]
pub struct IdSequences {
    rows: Vec<IdSequence>,
}

impl IdSequences {
    pub fn load(config: &StorageConfig) -> Result<Self, StorageError> {
        Ok(Self {
            rows: JsonlReader::for_kind(config, RecordKind::Sequence).read_all()?,
        })
    }

    /// Last id handed out for `kind`, or 0.
    pub fn last(&self, kind: RecordKind) -> u32 {
        self.rows
            .iter()
            .find(|r| r.kind == kind)
            .map(|r| r.last)
            .unwrap_or(0)
    }

    /// Hand out the next id for `kind`. `floor` is the lowest acceptable id,
    /// normally one past the highest id on disk, which covers records
    /// written before the kind had a mark.
    pub fn next(&mut self, kind: RecordKind, floor: u32) -> u32 {
        match self.rows.iter_mut().find(|r| r.kind == kind) {
            Some(row) => {
                row.last = (row.last + 1).max(floor);
                row.last
            }
            None => {
                self.rows.push(IdSequence { kind, last: floor });
                floor
            }
        }
    }

    pub fn stage(&self, config: &StorageConfig) -> Result<StagedFile, StorageError> {
        JsonlWriter::for_kind(config, RecordKind::Sequence).stage(&self.rows)
    }

    pub fn save(&self, config: &StorageConfig) -> Result<(), StorageError> {
        JsonlWriter::for_kind(config, RecordKind::Sequence).write_all(&self.rows)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_next_never_goes_back() {
        let mut sequences = IdSequences::default();

        assert_eq!(sequences.next(RecordKind::Match, 1), 1);
        assert_eq!(sequences.next(RecordKind::Match, 2), 2);
        // Highest match deleted: the floor drops but the mark holds.
        assert_eq!(sequences.next(RecordKind::Match, 2), 3);
        assert_eq!(sequences.next(RecordKind::Goal, 1), 1);
        assert_eq!(sequences.last(RecordKind::Match), 3);
        assert_eq!(sequences.last(RecordKind::Rating), 0);
    }

    #[test]
    fn test_floor_wins_over_stale_mark() {
        let mut sequences = IdSequences::default();
        sequences.next(RecordKind::Member, 1);

        assert_eq!(sequences.next(RecordKind::Member, 40), 40);
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let config = StorageConfig::new(tmp.path().to_path_buf());

        let mut sequences = IdSequences::default();
        sequences.next(RecordKind::Entry, 7);
        sequences.save(&config).unwrap();

        let loaded = IdSequences::load(&config).unwrap();
        assert_eq!(loaded.last(RecordKind::Entry), 7);
        assert!(config.record_path(RecordKind::Sequence).exists());
    }
}
