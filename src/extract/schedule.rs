//! Teacher and course-code metadata from the schedule page.

use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::dom::{cells, text_of};
use crate::models::record::ScheduleInfo;

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid selector"));
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").expect("valid selector"));

/// Find one subject's teacher and course code on the schedule page.
///
/// Rows follow the schedule-table layout: cell 2 = course code, cell 3 =
/// course name, cell 8 = teacher. The subject is matched by
/// case-insensitive containment in the name cell; the first hit wins.
/// Both fields degrade to absent when nothing matches.
pub fn extract_schedule_info(doc: &Html, subject_name: &str) -> ScheduleInfo {
    let Some(table) = doc.select(&TABLE).next() else {
        warn!("⚠️ schedule page has no table");
        return ScheduleInfo::default();
    };

    let needle = subject_name.trim().to_lowercase();

    // skip the header row
    for row in table.select(&TR).skip(1) {
        let cells = cells(&row);
        if cells.len() < 8 {
            continue;
        }

        let name = text_of(&cells[2]);
        if !name.to_lowercase().contains(&needle) {
            continue;
        }

        let course_code = text_of(&cells[1]);
        let teacher = text_of(&cells[7]);
        debug!("✓ schedule row for {}: {} / {}", name, teacher, course_code);
        return ScheduleInfo {
            teacher: (!teacher.is_empty()).then_some(teacher),
            course_code: (!course_code.is_empty()).then_some(course_code),
        };
    }

    warn!("⚠️ subject not on the schedule page: {}", subject_name);
    ScheduleInfo::default()
}
