//! Grade-table structure: semester segmentation, course rows, the thesis
//! grade and the semester-presence check.

use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use tracing::debug;

use super::dom::{cells, grade_rows, normalize_ws, parse_decimal, text_of};
use crate::error::ExtractError;
use crate::models::record::{CourseRecord, SemesterBlock};

/// Semester headers read like "HK1 (2025 - 2026)" or "Học kỳ 1 ...".
static SEMESTER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)hk\s*\d|học\s*kỳ").expect("valid regex"));

/// Thesis course names, tolerating both diacritic placements of "khóa".
static THESIS_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)kh[oó][aá]\s*luận").expect("valid regex"));

/// `title` attribute the portal puts on the final-grade cell.
const FINAL_GRADE_ATTR: &str = "DiemTongKet";

/// Group course rows under their semester headers, in page order.
///
/// A row is a header iff it spans multiple columns and carries a semester
/// marker. Rows before the first recognized header belong to no semester
/// and are dropped.
pub fn parse_semesters(doc: &Html) -> Vec<SemesterBlock> {
    let mut blocks: Vec<SemesterBlock> = Vec::new();

    for row in grade_rows(doc) {
        if let Some(label) = semester_header(&row) {
            debug!("📅 semester header: {}", label);
            blocks.push(SemesterBlock { label, courses: Vec::new() });
            continue;
        }

        match parse_course_row(&row) {
            Ok(course) => match blocks.last_mut() {
                Some(block) => block.courses.push(course),
                None => debug!("dropping course row before any semester header"),
            },
            Err(e) => debug!("not a course row: {}", e),
        }
    }

    blocks
}

/// Header label when the row is a semester header, `None` otherwise.
fn semester_header(row: &ElementRef) -> Option<String> {
    let spans_columns = cells(row)
        .iter()
        .any(|cell| cell.value().attr("colspan").is_some());
    if !spans_columns {
        return None;
    }
    let label = text_of(row);
    SEMESTER_MARKER.is_match(&label).then_some(label)
}

/// Parse one course row. Column positions are fixed by the portal:
/// cell 2 = course code, cell 3 = name, cell 4 = credits, the cell titled
/// `DiemTongKet` = final grade, and the letter grade sits third from the
/// end (second from the end on exactly-8-cell rows).
fn parse_course_row(row: &ElementRef) -> Result<CourseRecord, ExtractError> {
    let cells = cells(row);
    if cells.len() < 8 {
        return Err(ExtractError::ParseAmbiguity("course rows have at least 8 cells"));
    }

    let code = text_of(&cells[1]);
    let code_lower = code.to_lowercase();
    if code_lower == "mã môn" || code_lower == "stt" {
        return Err(ExtractError::ParseAmbiguity("grade-table header row"));
    }

    let name = text_of(&cells[2]);
    let credits = text_of(&cells[3]).parse().unwrap_or(0);

    let letter_index = if cells.len() == 8 { cells.len() - 2 } else { cells.len() - 3 };
    let letter = text_of(&cells[letter_index]);

    Ok(CourseRecord {
        code,
        name,
        credits,
        final_grade: final_grade_of(&cells),
        letter_grade: (!letter.is_empty()).then_some(letter),
    })
}

/// Value of the cell the portal titles `DiemTongKet`, when parseable.
fn final_grade_of(cells: &[ElementRef]) -> Option<f64> {
    cells
        .iter()
        .find(|cell| cell.value().attr("title") == Some(FINAL_GRADE_ATTR))
        .and_then(|cell| parse_decimal(&text_of(cell)))
}

/// First parseable thesis grade on the page, scanning every course row.
pub fn extract_thesis_grade(doc: &Html) -> Option<f64> {
    for row in grade_rows(doc) {
        let cells = cells(&row);
        if cells.len() < 8 {
            continue;
        }
        if !THESIS_MARKER.is_match(&text_of(&cells[2])) {
            continue;
        }
        if let Some(grade) = final_grade_of(&cells) {
            debug!("🎓 thesis grade: {}", grade);
            return Some(grade);
        }
    }
    None
}

/// Whether a semester header matching `label` exists on the page.
///
/// Both sides are whitespace-collapsed and lowercased before the
/// containment test, so header decoration around the label is harmless.
pub fn check_semester_exists(doc: &Html, label: &str) -> bool {
    let needle = normalize_ws(label).to_lowercase();
    for row in grade_rows(doc) {
        let spans_columns = cells(&row)
            .iter()
            .any(|cell| cell.value().attr("colspan").is_some());
        if !spans_columns {
            continue;
        }
        if text_of(&row).to_lowercase().contains(&needle) {
            return true;
        }
    }
    false
}
