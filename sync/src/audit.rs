//! JSONL audit trail logging.
//!
//! Each acctsync run appends events to the audit file, one JSON object per
//! line.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use acctdiff::{Account, Classification};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::plan::SyncPlan;

/// One line of the audit trail: event name, UTC timestamp, then the event
/// fields inlined.
#[derive(Debug, Serialize)]
struct AuditEvent<'a> {
    event: &'static str,
    ts: DateTime<Utc>,
    #[serde(flatten)]
    data: &'a serde_json::Value,
}

/// Append-only JSONL writer. Each event is flushed as soon as it is written.
pub struct AuditLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl AuditLog {
    /// Open the audit file for appending, creating it and its directory.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    /// Location of the audit file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one event. `data` must be a JSON object.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data: &data,
        };
        let line = serde_json::to_string(&entry).map_err(invalid_data)?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}

// Encoding failures are reported like any other audit write failure.
fn invalid_data(e: serde_json::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Log the start of a run.
pub fn log_run_started(
    audit: &mut AuditLog,
    command: &str,
    known_file: &str,
    provider_file: &str,
) -> Result<()> {
    audit.log(
        "run_started",
        serde_json::json!({
            "command": command,
            "known_file": known_file,
            "provider_file": provider_file,
        }),
    )
}

/// Log classification totals. Individual accounts are not recorded.
pub fn log_classification(audit: &mut AuditLog, diff: &Classification<'_, Account>) -> Result<()> {
    audit.log(
        "classification",
        serde_json::json!({
            "known": diff.known_len(),
            "provider": diff.provider_len(),
            "perfect_matches": diff.perfect_matches.len(),
            "duplicate_candidates": diff.duplicate_candidates.len(),
            "known_orphans": diff.known_orphans.len(),
            "provider_orphans": diff.provider_orphans.len(),
        }),
    )
}

/// Log one decision on a duplicate candidate.
pub fn log_review_decision(
    audit: &mut AuditLog,
    known: &Account,
    provider: &Account,
    merge: bool,
    automatic: bool,
) -> Result<()> {
    audit.log(
        "review_decision",
        serde_json::json!({
            "access_id": known.access_id.0,
            "known_vendor_id": known.vendor_account_id,
            "provider_vendor_id": provider.vendor_account_id,
            "decision": if merge { "merge" } else { "keep_separate" },
            "automatic": automatic,
        }),
    )
}

/// Log run completion with the plan totals.
pub fn log_run_completed(audit: &mut AuditLog, plan: &SyncPlan<'_>) -> Result<()> {
    let counts = serde_json::to_value(plan.counts()).map_err(invalid_data)?;
    audit.log("run_completed", serde_json::json!({ "actions": counts }))
}
