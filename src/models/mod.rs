pub mod checkpoint;
pub mod record;
pub mod subject;
pub mod task;

pub use checkpoint::{CheckpointRecord, RunCounts};
pub use record::{AcademicRecord, CourseRecord, ScheduleInfo, SemesterBlock, StudentStatus};
pub use subject::Subject;
pub use task::StudentTask;
