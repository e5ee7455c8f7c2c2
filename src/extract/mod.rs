//! Extraction layer: a parsed score page in, a normalized
//! [`AcademicRecord`] out.
//!
//! Everything here is a pure function over the document tree. Nothing in
//! this layer performs I/O, and nothing raises on malformed input: every
//! missing structure degrades to an absent field so one broken page can
//! never take down a batch.

mod dom;
pub mod dropout;
pub mod gpa;
pub mod schedule;
pub mod table;

use scraper::Html;

pub use schedule::extract_schedule_info;
pub use table::check_semester_exists;

use crate::config::Config;
use crate::models::record::{AcademicRecord, StudentStatus};

/// Score-page extractor, configured once per run.
pub struct PageExtractor {
    target_semester: String,
    dropout_threshold: f64,
}

impl PageExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            target_semester: config.target_semester.clone(),
            dropout_threshold: config.dropout_threshold,
        }
    }

    /// Run every extraction pass over one student's score page.
    pub fn extract(&self, doc: &Html) -> AcademicRecord {
        let gpa = gpa::extract_gpa(doc);
        let semesters = table::parse_semesters(doc);
        let thesis_grade = table::extract_thesis_grade(doc);
        let dropout = dropout::is_dropout(&semesters, self.dropout_threshold);
        let target_present = table::check_semester_exists(doc, &self.target_semester);

        AcademicRecord {
            gpa,
            semesters,
            dropout,
            thesis_grade,
            status: classify(dropout, target_present),
        }
    }
}

/// Status classification. The dropout verdict beats everything else;
/// otherwise a missing target semester means the student never registered
/// for it, and a present one means they are still on the completed path.
fn classify(dropout: bool, target_present: bool) -> StudentStatus {
    if dropout {
        StudentStatus::Dropout
    } else if !target_present {
        StudentStatus::NotRegistered
    } else {
        StudentStatus::Completed
    }
}
