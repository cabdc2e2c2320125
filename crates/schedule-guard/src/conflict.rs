//! Decide whether a proposed assignment double-books a room or a teacher.
//!
//! A candidate conflicts with an existing record of the same course when they
//! share a reserved room or teacher, meet on at least one common day, and their
//! `[start, end)` slots overlap. Slots that touch (one ends exactly when the
//! other starts) do NOT overlap. Blank rooms and teachers never match anything.
//!
//! Records are scanned in the order the caller supplies them; the first
//! conflicting record is the one reported.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::day::DaySet;
use crate::error::Result;

/// Which shared resource caused a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConflictReason {
    #[serde(rename = "RoomConflict")]
    Room,
    #[serde(rename = "TeacherConflict")]
    Teacher,
    Both,
}

impl ConflictReason {
    fn from_matches(same_room: bool, same_teacher: bool) -> Option<Self> {
        match (same_room, same_teacher) {
            (true, true) => Some(ConflictReason::Both),
            (true, false) => Some(ConflictReason::Room),
            (false, true) => Some(ConflictReason::Teacher),
            (false, false) => None,
        }
    }
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConflictReason::Room => "room",
            ConflictReason::Teacher => "teacher",
            ConflictReason::Both => "room and teacher",
        })
    }
}

/// Verdict for a single save attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ConflictResult {
    NoConflict,
    Conflict {
        /// Subject id of the existing record that blocks the save.
        with: String,
        reason: ConflictReason,
    },
}

impl ConflictResult {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ConflictResult::Conflict { .. })
    }

    /// Message suitable for showing to the person editing the timetable.
    pub fn message(&self) -> String {
        match self {
            ConflictResult::NoConflict => "No scheduling conflict.".to_string(),
            ConflictResult::Conflict { with, reason } => {
                let subject = match reason {
                    ConflictReason::Room => "The selected room is",
                    ConflictReason::Teacher => "The selected teacher is",
                    ConflictReason::Both => "The selected room and teacher are",
                };
                format!("{subject} already booked during this time (by subject {with}).")
            }
        }
    }
}

/// A conflict with one existing record, with the details needed to explain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDetail {
    pub with: String,
    pub reason: ConflictReason,
    /// Days both assignments meet on.
    pub shared_days: DaySet,
    /// Length of the overlapping part of the two slots, per shared day.
    pub overlap_minutes: i64,
}

impl From<&ConflictDetail> for ConflictResult {
    fn from(detail: &ConflictDetail) -> Self {
        ConflictResult::Conflict {
            with: detail.with.clone(),
            reason: detail.reason,
        }
    }
}

/// Check a candidate against the course's existing assignments.
///
/// Records with the candidate's own `subject_id` are ignored, so re-saving an
/// assignment never conflicts with its previous version. Records belonging to
/// another course are ignored too.
///
/// # Errors
/// Returns `ScheduleError::InvalidAssignment` if the candidate fails
/// [`Assignment::validate`].
pub fn check_conflict(candidate: &Assignment, existing: &[Assignment]) -> Result<ConflictResult> {
    candidate.validate()?;

    Ok(existing
        .iter()
        .find_map(|other| compare(candidate, other))
        .map(|detail| ConflictResult::from(&detail))
        .unwrap_or(ConflictResult::NoConflict))
}

/// Like [`check_conflict`], but report every conflicting record in input order.
///
/// # Errors
/// Returns `ScheduleError::InvalidAssignment` if the candidate fails
/// [`Assignment::validate`].
pub fn find_conflicts(candidate: &Assignment, existing: &[Assignment]) -> Result<Vec<ConflictDetail>> {
    candidate.validate()?;

    Ok(existing
        .iter()
        .filter_map(|other| compare(candidate, other))
        .collect())
}

/// Compare two assignments under the double-booking rule.
///
/// Neither side is validated here; an inverted slot simply never overlaps.
pub(crate) fn compare(candidate: &Assignment, other: &Assignment) -> Option<ConflictDetail> {
    if other.subject_id == candidate.subject_id || other.course_id != candidate.course_id {
        return None;
    }

    let same_room = shares(candidate.room(), other.room());
    let same_teacher = shares(candidate.teacher(), other.teacher());
    let reason = ConflictReason::from_matches(same_room, same_teacher)?;

    let shared_days = candidate.days.intersection(&other.days);
    if shared_days.is_empty() {
        return None;
    }

    // Half-open slots overlap iff each starts before the other ends.
    if !(candidate.time_start < other.time_end && candidate.time_end > other.time_start) {
        return None;
    }

    let overlap_start = candidate.time_start.max(other.time_start);
    let overlap_end = candidate.time_end.min(other.time_end);

    Some(ConflictDetail {
        with: other.subject_id.clone(),
        reason,
        shared_days,
        overlap_minutes: overlap_start.minutes_until(overlap_end),
    })
}

fn shares(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}
