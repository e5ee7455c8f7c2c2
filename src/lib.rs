//! # GPA Collector
//!
//! Automated collection of per-student academic records from a university
//! student portal: GPA, dropout verdict, thesis grade and per-course
//! teacher/course-code metadata, persisted row by row into a spreadsheet.
//!
//! ## Architecture
//!
//! The system is layered; each layer only depends on the one below it.
//!
//! ### ① Models
//! - `models/` - plain data: [`StudentTask`], [`AcademicRecord`],
//!   [`CheckpointRecord`], the [`Subject`] output vocabulary
//!
//! ### ② Extraction
//! - `extract/` - pure functions over a parsed document tree
//! - [`PageExtractor`] - score page -> [`AcademicRecord`], fallback-driven,
//!   never fails on malformed input
//!
//! ### ③ Services
//! - `services/` - one capability each, no flow knowledge
//! - [`CaptchaSolver`] - bounded-retry recognition over a [`CaptchaApi`]
//! - [`CheckpointStore`] - atomic load/save of collection progress
//! - [`ResultSink`] - fixed-column mapping onto a [`SheetStore`]
//! - [`PageFetcher`] - "URL -> rendered HTML" seam (browser or plain HTTP)
//!
//! ### ④ Orchestration
//! - `orchestrator/batch_processor` - the student-by-student loop: skip /
//!   attempt decision, resume from checkpoint, caps, final tally
//! - `orchestrator/student_processor` - one student: fetch, extract, write

pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// re-export the common types
pub use config::Config;
pub use error::{ExtractError, ScrapeError};
pub use extract::PageExtractor;
pub use models::checkpoint::{CheckpointRecord, RunCounts};
pub use models::record::{AcademicRecord, CourseRecord, SemesterBlock, StudentStatus};
pub use models::subject::Subject;
pub use models::task::StudentTask;
pub use orchestrator::App;
pub use services::captcha::{CaptchaApi, CaptchaImageSource, CaptchaSolver, CapsolverClient};
pub use services::checkpoint_store::CheckpointStore;
pub use services::fetcher::{HttpFetcher, PageFetcher};
pub use services::result_sink::{ResultSink, SubjectResult};
pub use services::sheet::{CsvSheet, SheetStore};
