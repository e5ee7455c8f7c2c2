//! The batch loop.
//!
//! Drives the roster student by student: decide skip vs attempt, fetch
//! and extract through `student_processor`, advance the checkpoint,
//! pause, repeat. Strictly sequential: the portal and the CAPTCHA
//! service are rate-sensitive, and resume safety needs checkpoint writes
//! in roster order.

use anyhow::{Context, Result};
use rand::Rng;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::extract::PageExtractor;
use crate::models::checkpoint::{CheckpointRecord, RunCounts};
use crate::models::task::StudentTask;
use crate::orchestrator::student_processor;
use crate::services::checkpoint_store::CheckpointStore;
use crate::services::fetcher::{HttpFetcher, PageFetcher};
use crate::services::sheet::{load_roster, CsvSheet, SheetStore};

/// Application root: owns the collaborators and the loop.
pub struct App<F: PageFetcher, S: SheetStore> {
    config: Config,
    fetcher: F,
    sheet: S,
    checkpoints: CheckpointStore,
    extractor: PageExtractor,
}

impl App<HttpFetcher, CsvSheet> {
    /// Production wiring: CSV sheet on disk, plain HTTP fetcher.
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let sheet = CsvSheet::open(&config.roster_path)
            .with_context(|| format!("cannot load roster {}", config.roster_path))?;
        Ok(Self::with_parts(config, HttpFetcher::new(), sheet))
    }
}

impl<F: PageFetcher, S: SheetStore> App<F, S> {
    /// Assemble from explicit collaborators.
    pub fn with_parts(config: Config, fetcher: F, sheet: S) -> Self {
        let checkpoints = CheckpointStore::new(&config.checkpoint_path);
        let extractor = PageExtractor::new(&config);
        Self { config, fetcher, sheet, checkpoints, extractor }
    }

    /// Run the batch to completion (or to a cap) and return the tally.
    pub async fn run(&mut self) -> Result<RunCounts> {
        let tasks = load_roster(&self.sheet);
        if tasks.is_empty() {
            warn!("⚠️ roster has no student rows, nothing to do");
            return Ok(RunCounts::default());
        }

        let checkpoint = self.checkpoints.load();
        let resume_after = checkpoint.as_ref().map(|c| c.last_processed_index);
        let mut counts = checkpoint.map(|c| c.counts).unwrap_or_default();
        log_roster_loaded(tasks.len(), resume_after);

        let started = Instant::now();
        let mut attempted = 0usize;

        for task in &tasks {
            // rows a previous run completed: no fetch, no skip check
            if resume_after.is_some_and(|last| task.row_index <= last) {
                continue;
            }

            if self.config.test_limit.is_some_and(|limit| attempted >= limit) {
                warn!("⚠️ test limit reached ({} newly processed students)", attempted);
                break;
            }
            if let Some(max_secs) = self.config.max_runtime_secs {
                if started.elapsed() >= Duration::from_secs(max_secs) {
                    warn!("⏱ wall-clock limit reached, stopping between students");
                    break;
                }
            }

            if task.should_skip(self.config.force_reprocess) {
                info!(
                    "⏩ row {} - {} already done ({}), skipping",
                    task.row_index,
                    task.student_id,
                    task.prior_status.as_deref().unwrap_or("")
                );
                counts.skipped += 1;
                continue;
            }

            attempted += 1;
            log_student_start(attempted, task);

            match student_processor::process_student(
                &self.fetcher,
                &self.extractor,
                &mut self.sheet,
                task,
            )
            .await
            {
                Ok(_record) => {
                    counts.success += 1;
                    self.advance_checkpoint(task, &counts);
                }
                Err(e) => {
                    error!("❌ row {} - {} failed: {:#}", task.row_index, task.student_id, e);
                    counts.failed += 1;
                }
            }

            self.pause_between_students().await;
        }

        print_final_tally(&counts);
        Ok(counts)
    }

    /// Overwrite the checkpoint after a processed student. A failed save
    /// is logged and absorbed: the worst case on crash is reprocessing
    /// one student whose status cell already marks it done.
    fn advance_checkpoint(&self, task: &StudentTask, counts: &RunCounts) {
        let record = CheckpointRecord::new(task.row_index, &task.student_id, counts.clone());
        if let Err(e) = self.checkpoints.save(&record) {
            error!("❌ checkpoint save failed: {}", e);
        }
    }

    /// Jittered pause so the request cadence does not look mechanical.
    async fn pause_between_students(&self) {
        let base = self.config.delay_between_students_secs;
        if base <= 0.0 {
            return;
        }
        let jitter = rand::thread_rng().gen_range(0.5..1.5);
        sleep(Duration::from_secs_f64(base * jitter)).await;
    }
}

// ========== log helpers ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 GPA collection run starting");
    info!("📄 roster: {}", config.roster_path);
    info!("🎯 target semester: {}", config.target_semester);
    if config.force_reprocess {
        info!("🔁 force reprocess: every row will be fetched again");
    }
    if let Some(limit) = config.test_limit {
        info!("⚠️ test mode: stopping after {} newly processed students", limit);
    }
    info!("{}", "=".repeat(60));
}

fn log_roster_loaded(total: usize, resume_after: Option<usize>) {
    info!("✓ {} student rows on the roster", total);
    match resume_after {
        Some(row) => info!("📂 resuming after row {}", row),
        None => info!("📝 fresh run, starting from the first row"),
    }
}

fn log_student_start(ordinal: usize, task: &StudentTask) {
    info!("");
    info!(
        "🔍 [{}] processing {} - {} (row {})",
        ordinal, task.student_id, task.name, task.row_index
    );
}

fn print_final_tally(counts: &RunCounts) {
    info!("");
    info!("{}", "=".repeat(60));
    info!("📊 run tally");
    info!("✅ success: {}", counts.success);
    info!("❌ failed:  {}", counts.failed);
    info!("⏩ skipped: {}", counts.skipped);
    info!("{}", "=".repeat(60));
    info!("🎉 DONE");
}
