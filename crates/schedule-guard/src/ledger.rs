//! In-memory store collaborator for course timetables.
//!
//! The conflict checker is only as good as the snapshot it is given. The ledger
//! shows the contract a store must honor around it: every course carries a
//! revision that is bumped on each write, and [`ScheduleLedger::commit`] refuses
//! to write when the course moved on since the caller's snapshot. Records are
//! keyed by `(course_id, subject_id)` and keep their insertion order, so
//! "first conflict wins" stays stable across saves.
//!
//! Methods take `&mut self`; share a ledger across threads behind a `Mutex`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assignment::Assignment;
use crate::conflict::{check_conflict, ConflictReason, ConflictResult};
use crate::error::{Result, ScheduleError};

/// A course's assignments as of a given revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSnapshot {
    pub course_id: String,
    pub revision: u64,
    pub assignments: Vec<Assignment>,
}

/// Outcome of a save attempt that reached the conflict check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SaveOutcome {
    Saved {
        document_id: String,
        /// False when an existing record for the subject was overwritten.
        created: bool,
        revision: u64,
    },
    Rejected {
        with: String,
        reason: ConflictReason,
    },
}

#[derive(Debug, Default)]
struct CourseEntry {
    revision: u64,
    assignments: Vec<Assignment>,
}

impl CourseEntry {
    fn position(&self, subject_id: &str) -> Option<usize> {
        self.assignments.iter().position(|a| a.subject_id == subject_id)
    }
}

#[derive(Debug, Default)]
pub struct ScheduleLedger {
    courses: HashMap<String, CourseEntry>,
}

impl ScheduleLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the ledger from stored documents without conflict checks.
    ///
    /// Later documents for the same `(course_id, subject_id)` overwrite earlier
    /// ones. Each touched course gets one revision bump.
    pub fn load(&mut self, assignments: impl IntoIterator<Item = Assignment>) {
        let mut touched: Vec<String> = Vec::new();
        for assignment in assignments {
            let entry = self.courses.entry(assignment.course_id.clone()).or_default();
            if !touched.contains(&assignment.course_id) {
                touched.push(assignment.course_id.clone());
            }
            match entry.position(&assignment.subject_id) {
                Some(idx) => entry.assignments[idx] = assignment,
                None => entry.assignments.push(assignment),
            }
        }
        for course_id in &touched {
            if let Some(entry) = self.courses.get_mut(course_id) {
                entry.revision += 1;
            }
        }
        debug!(courses = touched.len(), "loaded stored assignments");
    }

    /// Current revision of a course; 0 if nothing was ever written to it.
    pub fn revision(&self, course_id: &str) -> u64 {
        self.courses.get(course_id).map_or(0, |e| e.revision)
    }

    /// A copy of the course's assignments in insertion order.
    pub fn snapshot(&self, course_id: &str) -> CourseSnapshot {
        let (revision, assignments) = self
            .courses
            .get(course_id)
            .map_or((0, Vec::new()), |e| (e.revision, e.assignments.clone()));
        CourseSnapshot {
            course_id: course_id.to_string(),
            revision,
            assignments,
        }
    }

    pub fn get(&self, course_id: &str, subject_id: &str) -> Option<&Assignment> {
        let entry = self.courses.get(course_id)?;
        entry.position(subject_id).map(|idx| &entry.assignments[idx])
    }

    /// Check and write a candidate, provided the course is still at
    /// `expected_revision`.
    ///
    /// # Errors
    /// Returns `ScheduleError::StaleSnapshot` if the course was written since the
    /// caller's snapshot, or `ScheduleError::InvalidAssignment` if the candidate
    /// is malformed. A conflict is not an error: it comes back as
    /// [`SaveOutcome::Rejected`] and nothing is written.
    pub fn commit(&mut self, candidate: Assignment, expected_revision: u64) -> Result<SaveOutcome> {
        let actual = self.revision(&candidate.course_id);
        if actual != expected_revision {
            warn!(
                course_id = %candidate.course_id,
                expected = expected_revision,
                actual,
                "rejected save against stale snapshot"
            );
            return Err(ScheduleError::StaleSnapshot {
                course_id: candidate.course_id,
                expected: expected_revision,
                actual,
            });
        }

        let existing = self
            .courses
            .get(&candidate.course_id)
            .map_or(&[][..], |e| e.assignments.as_slice());

        if let ConflictResult::Conflict { with, reason } = check_conflict(&candidate, existing)? {
            info!(
                course_id = %candidate.course_id,
                subject_id = %candidate.subject_id,
                with = %with,
                %reason,
                "save rejected by scheduling conflict"
            );
            return Ok(SaveOutcome::Rejected { with, reason });
        }

        let document_id = candidate.document_id();
        let entry = self.courses.entry(candidate.course_id.clone()).or_default();
        let created = match entry.position(&candidate.subject_id) {
            Some(idx) => {
                entry.assignments[idx] = candidate;
                false
            }
            None => {
                entry.assignments.push(candidate);
                true
            }
        };
        entry.revision += 1;

        info!(%document_id, created, revision = entry.revision, "assignment saved");
        Ok(SaveOutcome::Saved {
            document_id,
            created,
            revision: entry.revision,
        })
    }

    /// Read, check and write in one exclusive step.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidAssignment` if the candidate is malformed.
    pub fn save(&mut self, candidate: Assignment) -> Result<SaveOutcome> {
        let revision = self.revision(&candidate.course_id);
        self.commit(candidate, revision)
    }

    /// Delete a course's record for a subject. Returns whether one existed.
    pub fn remove(&mut self, course_id: &str, subject_id: &str) -> bool {
        let Some(entry) = self.courses.get_mut(course_id) else {
            return false;
        };
        match entry.position(subject_id) {
            Some(idx) => {
                entry.assignments.remove(idx);
                entry.revision += 1;
                debug!(course_id, subject_id, revision = entry.revision, "assignment removed");
                true
            }
            None => false,
        }
    }
}
