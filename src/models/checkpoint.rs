//! Durable cross-run progress record.

use serde::{Deserialize, Serialize};

/// Running tally, carried inside the checkpoint so counts survive a
/// restart along with the resume position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounts {
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Marker of the last successfully completed roster row.
///
/// Written atomically after each processed student, read once at startup.
/// An absent record is the only "first run" signal the orchestrator needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointRecord {
    /// 1-indexed sheet row of the last student written out.
    pub last_processed_index: usize,
    pub last_processed_id: String,
    pub timestamp: String,
    pub counts: RunCounts,
}

impl CheckpointRecord {
    pub fn new(last_processed_index: usize, last_processed_id: &str, counts: RunCounts) -> Self {
        Self {
            last_processed_index,
            last_processed_id: last_processed_id.to_string(),
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            counts,
        }
    }
}
