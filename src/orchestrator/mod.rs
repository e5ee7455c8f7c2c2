//! Orchestration layer.
//!
//! ## Layout
//!
//! ### `batch_processor` - the student-by-student loop
//! - loads the roster and the checkpoint, decides skip vs attempt
//! - fast-forwards past rows a previous run already completed
//! - enforces the test-limit and wall-clock caps between tasks
//! - advances the checkpoint after every processed student
//! - emits the final success/failed/skipped tally, however the run ends
//!
//! ### `student_processor` - one student
//! - fetch the score page, extract the record, write it to the sheet
//! - a failure here marks one row failed; it never aborts the batch
//!
//! ## Flow
//!
//! ```text
//! batch_processor (Vec<StudentTask>)
//!     |
//! student_processor (one StudentTask)
//!     |
//! extract::PageExtractor + services (fetcher / sink / checkpoint)
//! ```

pub mod batch_processor;
pub mod student_processor;

pub use batch_processor::App;
pub use student_processor::process_student;
