//! # schedule-guard
//!
//! Double-booking checks for course timetables.
//!
//! When a room, teacher, day-set and time slot is assigned to a subject within a
//! course, schedule-guard decides whether that assignment collides with the
//! course's existing assignments before it is saved. The checker is a pure
//! function over explicit inputs: no I/O, no shared state, no reordering of the
//! caller's records.
//!
//! ## Modules
//!
//! - [`assignment`] — `Assignment` records and candidate validation
//! - [`day`] — `SchoolDay` (Monday–Saturday) and the `DaySet` bitset
//! - [`time`] — `TimeOfDay` wall-clock values parsed from `HH:MM`
//! - [`conflict`] — Candidate-vs-course conflict verdicts
//! - [`audit`] — Find double-bookings already present in a course
//! - [`ledger`] — In-memory store collaborator with revision-guarded saves
//! - [`error`] — Error types

pub mod assignment;
pub mod audit;
pub mod conflict;
pub mod day;
pub mod error;
pub mod ledger;
pub mod time;

pub use assignment::Assignment;
pub use audit::{audit_course, AuditReport, DoubleBooking};
pub use conflict::{check_conflict, find_conflicts, ConflictDetail, ConflictReason, ConflictResult};
pub use day::{DaySet, SchoolDay};
pub use error::ScheduleError;
pub use ledger::{CourseSnapshot, SaveOutcome, ScheduleLedger};
pub use time::TimeOfDay;
