//! Durable collection progress, one JSON record.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::ScrapeError;
use crate::models::checkpoint::CheckpointRecord;

/// Load-at-start / save-after-each-student store.
///
/// `save` goes through a temp file in the same directory followed by a
/// rename, so an interruption mid-write leaves the previous record
/// intact. An unreadable record downgrades to "no checkpoint": restarting
/// from the first row is always safe because processed rows carry a
/// status and get skipped.
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `None` means "start from the first task". That is the only
    /// first-run signal the orchestrator needs.
    pub fn load(&self) -> Option<CheckpointRecord> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => {
                info!("📝 no checkpoint, starting from the first row");
                return None;
            }
        };
        match serde_json::from_slice::<CheckpointRecord>(&bytes) {
            Ok(record) => {
                info!(
                    "📂 checkpoint loaded: row {} ({}) at {}",
                    record.last_processed_index, record.last_processed_id, record.timestamp
                );
                Some(record)
            }
            Err(e) => {
                warn!("⚠️ checkpoint unreadable ({}), starting over", e);
                None
            }
        }
    }

    pub fn save(&self, record: &CheckpointRecord) -> Result<(), ScrapeError> {
        let target = self.path.display().to_string();
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| ScrapeError::persistence(&target, e))?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), record)
            .map_err(|e| ScrapeError::persistence(&target, e))?;
        tmp.persist(&self.path)
            .map_err(|e| ScrapeError::persistence(&target, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::checkpoint::RunCounts;

    fn store_in(dir: &tempfile::TempDir) -> CheckpointStore {
        CheckpointStore::new(dir.path().join("checkpoint.json"))
    }

    #[test]
    fn absent_file_means_first_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(store_in(&dir).load().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        let counts = RunCounts { success: 3, failed: 1, skipped: 7 };
        store
            .save(&CheckpointRecord::new(12, "2001215800", counts.clone()))
            .expect("save");

        let loaded = store.load().expect("record present");
        assert_eq!(loaded.last_processed_index, 12);
        assert_eq!(loaded.last_processed_id, "2001215800");
        assert_eq!(loaded.counts, counts);
    }

    #[test]
    fn newer_save_overwrites_the_old_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store
            .save(&CheckpointRecord::new(2, "a", RunCounts::default()))
            .expect("save");
        store
            .save(&CheckpointRecord::new(3, "b", RunCounts::default()))
            .expect("save");

        assert_eq!(store.load().expect("record").last_processed_index, 3);
    }

    #[test]
    fn corrupt_records_downgrade_to_first_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("checkpoint.json");
        std::fs::write(&path, "{not json").expect("write");

        assert!(CheckpointStore::new(path).load().is_none());
    }
}
