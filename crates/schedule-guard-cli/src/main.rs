//! `schedguard` CLI — check, save and audit course timetables from the command line.
//!
//! All input is JSON in the shape of the stored `Schedules` documents. Output is
//! JSON on stdout; human-readable messages and logs go to stderr.
//!
//! ## Usage
//!
//! ```sh
//! # Check a candidate (stdin) against a course's stored assignments
//! cat candidate.json | schedguard check -e course.json
//!
//! # List every clash instead of the first one
//! schedguard check -c candidate.json -e course.json --all
//!
//! # Check and write: prints the updated course documents on success
//! schedguard save -c candidate.json -e course.json -o course.json
//!
//! # Find double-bookings already stored, per course
//! schedguard audit -i schedules.json
//! ```
//!
//! Exit status is 0 when there is nothing to report, 2 when a conflict or
//! double-booking was found, and 1 on invalid input.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use schedule_guard::{
    audit_course, check_conflict, find_conflicts, Assignment, AuditReport, ConflictResult,
    SaveOutcome, ScheduleLedger,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::io::{self, Read};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit status when the schedule has a conflict to report.
const EXIT_CONFLICT: i32 = 2;

#[derive(Parser)]
#[command(
    name = "schedguard",
    version,
    about = "Room and teacher double-booking checks for course timetables"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a candidate assignment against a course's stored assignments
    Check {
        /// Candidate assignment JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        candidate: Option<String>,
        /// JSON array of the course's stored assignments
        #[arg(short, long)]
        existing: String,
        /// Report every conflicting record, not just the first
        #[arg(long)]
        all: bool,
    },
    /// Check a candidate and, if it fits, write it into the course documents
    Save {
        /// Candidate assignment JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        candidate: Option<String>,
        /// JSON array of stored assignments
        #[arg(short, long)]
        existing: String,
        /// Output file for the updated documents (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Report double-bookings already present in stored assignments
    Audit {
        /// JSON array of stored assignments (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let conflict_found = match cli.command {
        Commands::Check {
            candidate,
            existing,
            all,
        } => run_check(candidate.as_deref(), &existing, all)?,
        Commands::Save {
            candidate,
            existing,
            output,
        } => run_save(candidate.as_deref(), &existing, output.as_deref())?,
        Commands::Audit { input } => run_audit(input.as_deref())?,
    };

    if conflict_found {
        process::exit(EXIT_CONFLICT);
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_check(candidate: Option<&str>, existing: &str, all: bool) -> Result<bool> {
    let candidate: Assignment = parse_json(&read_input(candidate)?, "candidate assignment")?;
    let existing: Vec<Assignment> = parse_json(&read_input(Some(existing))?, "stored assignments")?;
    debug!(
        subject_id = %candidate.subject_id,
        existing = existing.len(),
        "checking candidate"
    );

    if all {
        let details = find_conflicts(&candidate, &existing).context("Cannot check candidate")?;
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(!details.is_empty());
    }

    let verdict = check_conflict(&candidate, &existing).context("Cannot check candidate")?;
    println!("{}", serde_json::to_string(&verdict)?);
    if verdict.is_conflict() {
        eprintln!("{}", verdict.message());
    }
    Ok(verdict.is_conflict())
}

fn run_save(candidate: Option<&str>, existing: &str, output: Option<&str>) -> Result<bool> {
    let candidate: Assignment = parse_json(&read_input(candidate)?, "candidate assignment")?;
    let stored: Vec<Assignment> = parse_json(&read_input(Some(existing))?, "stored assignments")?;

    // Other courses pass through untouched, in their original order.
    let course_id = candidate.course_id.clone();
    let (course, others): (Vec<Assignment>, Vec<Assignment>) =
        stored.into_iter().partition(|a| a.course_id == course_id);

    let mut ledger = ScheduleLedger::new();
    ledger.load(course);

    match ledger.save(candidate).context("Cannot save candidate")? {
        SaveOutcome::Rejected { with, reason } => {
            let verdict = ConflictResult::Conflict { with, reason };
            eprintln!("{}", verdict.message());
            println!("{}", serde_json::to_string(&verdict)?);
            Ok(true)
        }
        SaveOutcome::Saved {
            document_id,
            created,
            ..
        } => {
            info!(%document_id, created, "candidate written");
            let mut documents = others;
            documents.extend(ledger.snapshot(&course_id).assignments);
            write_output(output, &serde_json::to_string_pretty(&documents)?)?;
            Ok(false)
        }
    }
}

fn run_audit(input: Option<&str>) -> Result<bool> {
    let stored: Vec<Assignment> = parse_json(&read_input(input)?, "stored assignments")?;

    // Group by course, keeping the order in which courses first appear.
    let mut courses: Vec<(String, Vec<Assignment>)> = Vec::new();
    for assignment in stored {
        match courses.iter_mut().find(|(id, _)| *id == assignment.course_id) {
            Some((_, group)) => group.push(assignment),
            None => courses.push((assignment.course_id.clone(), vec![assignment])),
        }
    }

    let mut reports = Map::new();
    let mut dirty = false;
    for (course_id, group) in &courses {
        let report: AuditReport = audit_course(group);
        if !report.is_clean() {
            dirty = true;
            eprintln!(
                "{}: {} double-booking(s)",
                course_id,
                report.double_bookings.len()
            );
        }
        reports.insert(course_id.clone(), serde_json::to_value(&report)?);
    }

    let body = json!({ "courses": Value::Object(reports) });
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(dirty)
}

fn parse_json<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T> {
    serde_json::from_str(raw).with_context(|| format!("Invalid {} JSON", what))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
