//! Fixed-column mapping of extraction results onto the output sheet.
//!
//! The mapping is schema-driven: every [`AcademicRecord`] field owns one
//! column, and the per-subject variant resolves subject names through the
//! [`Subject`] vocabulary. Nothing is placed positionally by accident,
//! and unmapped subject names are reported back, never silently dropped.

use tracing::{debug, warn};

use crate::models::record::AcademicRecord;
use crate::models::subject::Subject;
use crate::services::sheet::SheetStore;

// Roster / output columns, 1-indexed.
pub const COL_STUDENT_ID: usize = 1;
pub const COL_LAST_NAME: usize = 2;
pub const COL_FIRST_NAME: usize = 3;
pub const COL_LINK: usize = 5;
pub const COL_GPA: usize = 6;
pub const COL_THESIS: usize = 7;
/// Also the skip signal: a non-empty status cell means "done".
pub const COL_STATUS: usize = 8;

/// Per-subject payload for the richer sheet variant.
#[derive(Debug, Clone, Default)]
pub struct SubjectResult {
    pub grade: Option<f64>,
    pub teacher: Option<String>,
    pub course_code: Option<String>,
}

/// Stateless writer over a [`SheetStore`].
pub struct ResultSink;

impl ResultSink {
    /// Write one student's record into its roster row.
    ///
    /// Absent GPA and thesis grades leave their cells untouched so a
    /// later forced rerun can fill them in; the status label is always
    /// written because it doubles as the processed marker.
    pub fn write_record<S: SheetStore + ?Sized>(
        sheet: &mut S,
        row: usize,
        link: &str,
        record: &AcademicRecord,
    ) {
        sheet.write_cell(row, COL_LINK, link);
        if let Some(gpa) = record.gpa {
            sheet.write_cell(row, COL_GPA, &gpa.to_string());
        }
        if let Some(thesis) = record.thesis_grade {
            sheet.write_cell(row, COL_THESIS, &thesis.to_string());
        }
        sheet.write_cell(row, COL_STATUS, record.status.label());
        debug!(
            "📝 row {}: GPA={:?} thesis={:?} status={}",
            row, record.gpa, record.thesis_grade, record.status
        );
    }

    /// Write subject-specific `(grade, teacher, course code)` triples.
    ///
    /// Returns the subject names that are not in the vocabulary; callers
    /// decide whether that is worth failing over, the sink only reports.
    pub fn write_subject_results<S: SheetStore + ?Sized>(
        sheet: &mut S,
        row: usize,
        results: &[(String, SubjectResult)],
    ) -> Vec<String> {
        let mut unmapped = Vec::new();

        for (name, result) in results {
            let Some(subject) = Subject::find(name) else {
                warn!("⚠️ no column mapping for subject: {}", name);
                unmapped.push(name.clone());
                continue;
            };
            let (grade_col, teacher_col, code_col) = subject.columns();

            if let Some(grade) = result.grade {
                sheet.write_cell(row, grade_col, &grade.to_string());
            }
            if let Some(teacher) = &result.teacher {
                sheet.write_cell(row, teacher_col, teacher);
            }
            if let Some(code) = &result.course_code {
                sheet.write_cell(row, code_col, code);
            }
            debug!("📝 row {}: {} -> cols {}-{}-{}", row, subject, grade_col, teacher_col, code_col);
        }

        unmapped
    }
}
