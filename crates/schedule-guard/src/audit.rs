//! Find double-bookings already persisted in a course timetable.
//!
//! Two saves that each passed [`check_conflict`](crate::check_conflict) against
//! the same stale snapshot can still land a double-booking. The audit walks a
//! stored course set pairwise and reports every pair that breaks the rule.

use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::conflict::{compare, ConflictReason};
use crate::day::DaySet;

/// Two stored assignments that double-book a room or teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoubleBooking {
    /// Subject id of the earlier record in input order.
    pub first: String,
    /// Subject id of the later record in input order.
    pub second: String,
    pub reason: ConflictReason,
    pub shared_days: DaySet,
    pub overlap_minutes: i64,
}

/// Result of auditing one course's stored assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub double_bookings: Vec<DoubleBooking>,
    /// Subject ids of records that were skipped because they fail validation.
    pub invalid: Vec<String>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.double_bookings.is_empty()
    }
}

/// Audit a course's stored assignments for double-bookings.
///
/// Every unordered pair is compared once, in input order (`i < j`). Records that
/// fail [`Assignment::validate`] are listed in [`AuditReport::invalid`] and left
/// out of the comparison.
pub fn audit_course(assignments: &[Assignment]) -> AuditReport {
    let mut report = AuditReport::default();

    let valid: Vec<&Assignment> = assignments
        .iter()
        .filter(|a| match a.validate() {
            Ok(()) => true,
            Err(_) => {
                report.invalid.push(a.subject_id.clone());
                false
            }
        })
        .collect();

    for (i, first) in valid.iter().enumerate() {
        for second in &valid[i + 1..] {
            if let Some(detail) = compare(first, second) {
                report.double_bookings.push(DoubleBooking {
                    first: first.subject_id.clone(),
                    second: detail.with,
                    reason: detail.reason,
                    shared_days: detail.shared_days,
                    overlap_minutes: detail.overlap_minutes,
                });
            }
        }
    }

    report
}
