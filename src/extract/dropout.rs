//! Dropout heuristic over segmented semesters.
//!
//! A heuristic verdict, not an authoritative enrollment status: a
//! semester where most qualifying courses have no grade, or most were
//! failed outright, reads as the student having walked away mid-term.

use tracing::warn;

use crate::models::record::SemesterBlock;

/// Course names excluded from the statistics regardless of credit value:
/// physical education, military training and orientation sessions are
/// graded erratically even for active students.
const ADMINISTRATIVE_MARKERS: [&str; 3] = ["thể chất", "quốc phòng", "sinh hoạt"];

pub(crate) fn is_administrative(name: &str) -> bool {
    let name = name.to_lowercase();
    ADMINISTRATIVE_MARKERS.iter().any(|m| name.contains(m))
}

/// First-match-wins dropout check.
///
/// Per semester, over courses with credits > 0 that are not
/// administrative: if the share of missing-or-zero final grades, or the
/// share of F/D/D+ letter grades, strictly exceeds `threshold`, the
/// student is a dropout. Detection stops at the first such semester; no
/// aggregation across semesters.
pub fn is_dropout(semesters: &[SemesterBlock], threshold: f64) -> bool {
    for block in semesters {
        let qualifying: Vec<_> = block
            .courses
            .iter()
            .filter(|c| c.credits > 0 && !is_administrative(&c.name))
            .collect();
        if qualifying.is_empty() {
            continue;
        }

        let total = qualifying.len() as f64;
        let missing = qualifying
            .iter()
            .filter(|c| c.final_grade.is_none_or(|g| g == 0.0))
            .count() as f64;
        let failed = qualifying
            .iter()
            .filter(|c| matches!(c.letter_grade.as_deref().map(str::trim), Some("F" | "D" | "D+")))
            .count() as f64;

        if missing / total > threshold {
            warn!(
                "⚠️ dropout signal in {}: {}/{} courses without a grade",
                block.label, missing, total
            );
            return true;
        }
        if failed / total > threshold {
            warn!(
                "⚠️ dropout signal in {}: {}/{} courses failed",
                block.label, failed, total
            );
            return true;
        }
    }
    false
}
