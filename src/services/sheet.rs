//! Cell-level access to the roster / output sheet.
//!
//! The orchestrator only ever needs "read cell", "write cell" and
//! "persist"; [`SheetStore`] is that seam. The bundled implementation is
//! a CSV grid, which keeps the workbook mechanics out of the core.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::error::ScrapeError;
use crate::models::task::StudentTask;
use crate::services::result_sink::{COL_FIRST_NAME, COL_LAST_NAME, COL_LINK, COL_STATUS, COL_STUDENT_ID};

/// Minimal spreadsheet surface. Rows and columns are 1-indexed, matching
/// how the sheets are discussed and audited by hand.
pub trait SheetStore: Send {
    fn row_count(&self) -> usize;
    /// `None` when the cell is outside the grid.
    fn read_cell(&self, row: usize, col: usize) -> Option<&str>;
    /// Grows the grid as needed; out-of-range rows gain empty cells.
    fn write_cell(&mut self, row: usize, col: usize, value: &str);
    /// Flush the grid to durable storage.
    fn persist(&mut self) -> Result<(), ScrapeError>;
}

/// CSV-backed sheet. The whole grid lives in memory; `persist` rewrites
/// the file, so a failed save keeps results for the next flush.
pub struct CsvSheet {
    path: PathBuf,
    grid: Vec<Vec<String>>,
}

impl CsvSheet {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("cannot open sheet {}", path.display()))?;

        let mut grid = Vec::new();
        for record in reader.records() {
            let record = record.with_context(|| format!("malformed row in {}", path.display()))?;
            grid.push(record.iter().map(str::to_string).collect());
        }

        info!("📂 sheet loaded: {} ({} rows)", path.display(), grid.len());
        Ok(Self { path, grid })
    }
}

impl SheetStore for CsvSheet {
    fn row_count(&self) -> usize {
        self.grid.len()
    }

    fn read_cell(&self, row: usize, col: usize) -> Option<&str> {
        if row == 0 || col == 0 {
            return None;
        }
        self.grid.get(row - 1)?.get(col - 1).map(String::as_str)
    }

    fn write_cell(&mut self, row: usize, col: usize, value: &str) {
        if row == 0 || col == 0 {
            return;
        }
        if self.grid.len() < row {
            self.grid.resize_with(row, Vec::new);
        }
        let cells = &mut self.grid[row - 1];
        if cells.len() < col {
            cells.resize(col, String::new());
        }
        cells[col - 1] = value.to_string();
    }

    fn persist(&mut self) -> Result<(), ScrapeError> {
        let target = self.path.display().to_string();
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| ScrapeError::persistence(&target, e))?;
        for row in &self.grid {
            writer
                .write_record(row)
                .map_err(|e| ScrapeError::persistence(&target, e))?;
        }
        writer.flush().map_err(|e| ScrapeError::persistence(&target, e))?;
        Ok(())
    }
}

/// Build the work list from the sheet, one task per student row.
///
/// Row 1 is the header. Rows without a student id are ignored entirely,
/// exactly as a human skips blank lines in the roster.
pub fn load_roster<S: SheetStore + ?Sized>(sheet: &S) -> Vec<StudentTask> {
    let mut tasks = Vec::new();

    for row in 2..=sheet.row_count() {
        let student_id = match sheet.read_cell(row, COL_STUDENT_ID) {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => continue,
        };

        let last = sheet.read_cell(row, COL_LAST_NAME).unwrap_or("").trim();
        let first = sheet.read_cell(row, COL_FIRST_NAME).unwrap_or("").trim();
        let name = format!("{} {}", last, first).trim().to_string();

        let score_page_url = sheet
            .read_cell(row, COL_LINK)
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        let prior_status = sheet
            .read_cell(row, COL_STATUS)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        tasks.push(StudentTask {
            row_index: row,
            student_id,
            name,
            score_page_url,
            prior_status,
        });
    }

    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_csv(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("sheet.csv");
        std::fs::write(&path, contents).expect("write csv");
        (dir, path)
    }

    #[test]
    fn cells_round_trip_through_persist() {
        let (_dir, path) = temp_csv("MSSV,Họ đệm,Tên\n2001215800,Nguyễn,An\n");
        let mut sheet = CsvSheet::open(&path).expect("open");

        sheet.write_cell(2, 6, "3.22");
        sheet.persist().expect("persist");

        let reloaded = CsvSheet::open(&path).expect("reopen");
        assert_eq!(reloaded.read_cell(2, 1), Some("2001215800"));
        assert_eq!(reloaded.read_cell(2, 6), Some("3.22"));
    }

    #[test]
    fn reads_outside_the_grid_are_none() {
        let (_dir, path) = temp_csv("a,b\n");
        let sheet = CsvSheet::open(&path).expect("open");
        assert_eq!(sheet.read_cell(1, 3), None);
        assert_eq!(sheet.read_cell(5, 1), None);
        assert_eq!(sheet.read_cell(0, 0), None);
    }

    #[test]
    fn roster_rows_without_an_id_are_ignored() {
        let (_dir, path) = temp_csv(
            "MSSV,Họ đệm,Tên,Lớp,Link,GPA,KL,Trạng thái\n\
             2001215800,Nguyễn,An,14DHTH,https://portal.test/1,,,\n\
             ,,,,,,,\n\
             2001215801,Trần,Bình,14DHTH,,,,Có điểm\n",
        );
        let sheet = CsvSheet::open(&path).expect("open");
        let tasks = load_roster(&sheet);

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].row_index, 2);
        assert_eq!(tasks[0].name, "Nguyễn An");
        assert_eq!(tasks[0].score_page_url.as_deref(), Some("https://portal.test/1"));
        assert_eq!(tasks[0].prior_status, None);
        assert_eq!(tasks[1].row_index, 4);
        assert_eq!(tasks[1].score_page_url, None);
        assert_eq!(tasks[1].prior_status.as_deref(), Some("Có điểm"));
    }
}
