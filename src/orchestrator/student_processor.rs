//! One student: fetch, extract, write.

use anyhow::{Context, Result};
use scraper::Html;
use tracing::{error, info};

use crate::extract::PageExtractor;
use crate::models::record::AcademicRecord;
use crate::models::task::StudentTask;
use crate::services::fetcher::PageFetcher;
use crate::services::result_sink::ResultSink;
use crate::services::sheet::SheetStore;
use crate::utils::logging::truncate_text;

/// Process a single roster row end to end.
///
/// Any error here fails this one student; the batch loop logs it and
/// moves on. A sheet-persist failure is the exception: the result stays
/// in the grid for the next flush, so the student still counts as
/// processed.
pub async fn process_student<F: PageFetcher, S: SheetStore + ?Sized>(
    fetcher: &F,
    extractor: &PageExtractor,
    sheet: &mut S,
    task: &StudentTask,
) -> Result<AcademicRecord> {
    let url = task
        .score_page_url
        .as_deref()
        .context("no score page link on the roster row")?;

    info!("  🔗 {}", truncate_text(url, 80));
    let html = fetcher.fetch_page(url).await?;

    let record = {
        let doc = Html::parse_document(&html);
        extractor.extract(&doc)
    };
    log_record(&record);

    ResultSink::write_record(sheet, task.row_index, url, &record);
    if let Err(e) = sheet.persist() {
        // kept in memory; the next successful persist flushes this row too
        error!("  ❌ sheet save failed, result retained for the next flush: {}", e);
    }

    Ok(record)
}

fn log_record(record: &AcademicRecord) {
    info!(
        "  📈 GPA: {} | thesis: {} | status: {}",
        record
            .gpa
            .map(|g| g.to_string())
            .unwrap_or_else(|| "-".to_string()),
        record
            .thesis_grade
            .map(|g| g.to_string())
            .unwrap_or_else(|| "-".to_string()),
        record.status
    );
}
