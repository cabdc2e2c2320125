//! Schedule assignments: one subject section placed in a room, with a teacher,
//! on a set of days, for a time slot.
//!
//! The JSON shape matches the `Schedules` documents the admin panel stores
//! (`courseId`, `subjectId`, `room`, `teacher`, `days`, `timeStart`, `timeEnd`).

use serde::{Deserialize, Serialize};

use crate::day::DaySet;
use crate::error::{Result, ScheduleError};
use crate::time::TimeOfDay;

/// A subject section's slot within a course timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub course_id: String,
    pub subject_id: String,
    /// Room identifier. `None` or blank means no room is reserved.
    #[serde(default)]
    pub room: Option<String>,
    /// Staff id of the instructor. `None` or blank means unassigned.
    #[serde(default)]
    pub teacher: Option<String>,
    #[serde(default)]
    pub days: DaySet,
    pub time_start: TimeOfDay,
    pub time_end: TimeOfDay,
}

impl Assignment {
    /// Create an assignment with no room and no teacher.
    pub fn new(
        course_id: impl Into<String>,
        subject_id: impl Into<String>,
        days: impl Into<DaySet>,
        time_start: TimeOfDay,
        time_end: TimeOfDay,
    ) -> Self {
        Self {
            course_id: course_id.into(),
            subject_id: subject_id.into(),
            room: None,
            teacher: None,
            days: days.into(),
            time_start,
            time_end,
        }
    }

    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    pub fn with_teacher(mut self, teacher: impl Into<String>) -> Self {
        self.teacher = Some(teacher.into());
        self
    }

    /// The reserved room, if one is set.
    pub fn room(&self) -> Option<&str> {
        reserved(self.room.as_deref())
    }

    /// The assigned teacher, if one is set.
    pub fn teacher(&self) -> Option<&str> {
        reserved(self.teacher.as_deref())
    }

    /// Key under which the store persists this assignment.
    pub fn document_id(&self) -> String {
        format!("{}-{}", self.course_id, self.subject_id)
    }

    pub fn duration_minutes(&self) -> i64 {
        self.time_start.minutes_until(self.time_end)
    }

    /// Check that this assignment can take part in a conflict check.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidAssignment` when the course or subject id
    /// is blank, no day is selected, or the slot does not end after it starts
    /// (which also rules out overnight spans).
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| {
            Err(ScheduleError::InvalidAssignment {
                subject_id: self.subject_id.clone(),
                reason: reason.to_string(),
            })
        };

        if self.course_id.trim().is_empty() {
            return invalid("missing course id");
        }
        if self.subject_id.trim().is_empty() {
            return invalid("missing subject id");
        }
        if self.days.is_empty() {
            return invalid("no days selected");
        }
        if self.time_start >= self.time_end {
            return invalid(&format!(
                "start time {} is not before end time {}",
                self.time_start, self.time_end
            ));
        }
        Ok(())
    }
}

fn reserved(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
