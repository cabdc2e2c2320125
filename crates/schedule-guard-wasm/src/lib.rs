//! WASM bindings for schedule-guard.
//!
//! Lets the admin panel run the conflict check in the browser right before it
//! writes a `Schedules` document. Inputs are the same JSON documents the panel
//! already holds (`courseId`, `subjectId`, `room`, `teacher`, `days`,
//! `timeStart`, `timeEnd`); outputs are JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p schedule-guard-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/schedule-guard-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/schedule_guard_wasm.wasm
//! ```

use schedule_guard::Assignment;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers: JSON across the boundary
// ---------------------------------------------------------------------------

fn parse_candidate(json: &str) -> Result<Assignment, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid candidate JSON: {}", e))
}

fn parse_assignments(json: &str) -> Result<Vec<Assignment>, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid assignments JSON: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Plain-Rust entry points (testable off-wasm)
// ---------------------------------------------------------------------------

/// Check a candidate against the course's stored assignments.
///
/// Returns `{"status":"noConflict"}` or
/// `{"status":"conflict","with":"<subjectId>","reason":"RoomConflict|TeacherConflict|Both"}`.
pub fn check_conflict_json(candidate_json: &str, existing_json: &str) -> Result<String, String> {
    let candidate = parse_candidate(candidate_json)?;
    let existing = parse_assignments(existing_json)?;
    let verdict =
        schedule_guard::check_conflict(&candidate, &existing).map_err(|e| e.to_string())?;
    to_json(&verdict)
}

/// List every stored assignment the candidate clashes with, in input order.
pub fn find_conflicts_json(candidate_json: &str, existing_json: &str) -> Result<String, String> {
    let candidate = parse_candidate(candidate_json)?;
    let existing = parse_assignments(existing_json)?;
    let details =
        schedule_guard::find_conflicts(&candidate, &existing).map_err(|e| e.to_string())?;
    to_json(&details)
}

/// Audit one course's stored assignments for double-bookings.
pub fn audit_course_json(assignments_json: &str) -> Result<String, String> {
    let assignments = parse_assignments(assignments_json)?;
    to_json(&schedule_guard::audit_course(&assignments))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Check a candidate assignment against the course's stored assignments.
///
/// Throws a JS error if either argument is not valid JSON or the candidate is
/// malformed (no days, blank ids, start not before end).
#[wasm_bindgen(js_name = "checkConflict")]
pub fn check_conflict(candidate_json: &str, existing_json: &str) -> Result<String, JsValue> {
    check_conflict_json(candidate_json, existing_json).map_err(|e| JsValue::from_str(&e))
}

/// Every conflicting stored assignment, each with `with`, `reason`,
/// `sharedDays` and `overlapMinutes`.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(candidate_json: &str, existing_json: &str) -> Result<String, JsValue> {
    find_conflicts_json(candidate_json, existing_json).map_err(|e| JsValue::from_str(&e))
}

/// Double-bookings already present in a course, plus ids of records that could
/// not be checked.
#[wasm_bindgen(js_name = "auditCourse")]
pub fn audit_course(assignments_json: &str) -> Result<String, JsValue> {
    audit_course_json(assignments_json).map_err(|e| JsValue::from_str(&e))
}
