//! Extraction results for one student's score page.

/// Enrollment status for the target semester. Exactly one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentStatus {
    /// Grades present and the student is still on a completed path.
    Completed,
    /// The dropout heuristic fired for at least one semester.
    Dropout,
    /// No score rows exist for the target semester.
    NotRegistered,
}

impl StudentStatus {
    /// Localized label written to the status column.
    pub fn label(self) -> &'static str {
        match self {
            StudentStatus::Completed => "Có điểm",
            StudentStatus::Dropout => "Nghỉ học",
            StudentStatus::NotRegistered => "Chưa đăng ký",
        }
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One course row from the grade table.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseRecord {
    pub code: String,
    pub name: String,
    /// 0-credit rows are informational and never enter dropout statistics.
    pub credits: u32,
    /// Absent when the grade cell is empty or non-numeric; never zeroed.
    pub final_grade: Option<f64>,
    pub letter_grade: Option<String>,
}

/// A contiguous run of course rows under one semester header.
#[derive(Debug, Clone, PartialEq)]
pub struct SemesterBlock {
    /// Header text as it appears on the page, e.g. "HK1 (2025 - 2026)".
    pub label: String,
    pub courses: Vec<CourseRecord>,
}

/// Normalized extraction result for one student.
///
/// Invariants: `gpa` is always on the 4-point scale (10-point figures are
/// rejected during parsing, never mixed in) and `dropout == true` implies
/// `status != Completed`.
#[derive(Debug, Clone, PartialEq)]
pub struct AcademicRecord {
    /// Cumulative 4-point GPA. Absent means "not found on the page",
    /// which is distinct from a true 0.0.
    pub gpa: Option<f64>,
    /// Page order is preserved.
    pub semesters: Vec<SemesterBlock>,
    pub dropout: bool,
    /// Absent = thesis never attempted; 0 = attempted and failed.
    pub thesis_grade: Option<f64>,
    pub status: StudentStatus,
}

/// Teacher and course-code metadata for one subject, read off the
/// schedule page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleInfo {
    pub teacher: Option<String>,
    pub course_code: Option<String>,
}
