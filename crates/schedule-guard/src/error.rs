//! Error types for schedule-guard operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The candidate cannot be checked (missing ids, no days, inverted times).
    #[error("Invalid assignment '{subject_id}': {reason}")]
    InvalidAssignment { subject_id: String, reason: String },

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Unknown school day: {0}")]
    UnknownDay(String),

    /// The course changed between the snapshot and the write.
    #[error("Stale snapshot for course '{course_id}': expected revision {expected}, found {actual}")]
    StaleSnapshot {
        course_id: String,
        expected: u64,
        actual: u64,
    },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
