//! One roster row of work.

/// A unit of work built fresh from a roster row on every run; never
/// mutated, consumed by exactly one loop iteration.
#[derive(Debug, Clone)]
pub struct StudentTask {
    /// 1-indexed sheet row this task was read from (and writes back to).
    pub row_index: usize,
    pub student_id: String,
    pub name: String,
    /// Absent means the row cannot be attempted.
    pub score_page_url: Option<String>,
    /// Content of the status cell; non-empty means "already processed".
    pub prior_status: Option<String>,
}

impl StudentTask {
    /// A row is skipped when its status cell already holds something and
    /// reprocessing is not forced. Skipping costs no fetch and no CAPTCHA.
    pub fn should_skip(&self, force_reprocess: bool) -> bool {
        if force_reprocess {
            return false;
        }
        self.prior_status
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty())
    }
}
