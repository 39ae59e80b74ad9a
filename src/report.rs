//! Final execution report: drain the closed result channel once and tally it.

use colored::Colorize;
use crossbeam_channel::Receiver;
use serde::Serialize;
use std::fmt::Write as _;

use crate::{Record, RecordStatus};

/// One line of the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportLine {
    pub position: usize,
    pub id: String,
    pub display_name: String,
    pub status: RecordStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Record> for ReportLine {
    fn from(r: Record) -> Self {
        let status = r.status();
        let error = r.failure().map(str::to_string);
        ReportLine {
            position: r.position,
            id: r.id,
            display_name: r.display_name,
            status,
            error,
        }
    }
}

/// Totals plus one line per record, ordered by batch position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Records that reached the report unsettled. Always 0 unless a worker is broken.
    pub pending: usize,
    pub lines: Vec<ReportLine>,
}

/// Drain `results` until it is closed. Call only after the worker barrier, when every sender is
/// gone; otherwise this blocks until they are.
pub fn aggregate(results: Receiver<Record>) -> Report {
    let mut report = Report::default();
    for record in results.iter() {
        match record.status() {
            RecordStatus::Success => report.succeeded += 1,
            RecordStatus::Failed => report.failed += 1,
            RecordStatus::Pending => {
                log::error!("record {} reached the report unsettled", record.id);
                report.pending += 1;
            }
        }
        report.lines.push(ReportLine::from(record));
    }
    report.total = report.lines.len();
    report.lines.sort_by_key(|l| l.position);
    report
}

impl Report {
    pub fn count(&self, status: RecordStatus) -> usize {
        match status {
            RecordStatus::Success => self.succeeded,
            RecordStatus::Failed => self.failed,
            RecordStatus::Pending => self.pending,
        }
    }

    /// `(id, status)` pairs in report order.
    pub fn outcomes(&self) -> Vec<(String, RecordStatus)> {
        self.lines
            .iter()
            .map(|l| (l.id.clone(), l.status))
            .collect()
    }

    pub fn is_all_success(&self) -> bool {
        self.succeeded == self.total
    }

    /// Plain-text rendering (no colors).
    pub fn render(&self) -> String {
        let mut out = String::from("--- Final Execution Report ---\n");
        for line in &self.lines {
            let _ = match &line.error {
                Some(e) => writeln!(out, "[{}] {} ({})", line.status, line.display_name, e),
                None => writeln!(out, "[{}] {}", line.status, line.display_name),
            };
        }
        let _ = writeln!(
            out,
            "Total: {}  Success: {}  Failed: {}",
            self.total, self.succeeded, self.failed
        );
        out
    }

    /// Colored rendering for a terminal.
    pub fn print(&self) {
        println!("\n{}", "--- Final Execution Report ---".bold());
        for line in &self.lines {
            let status = match line.status {
                RecordStatus::Success => line.status.as_str().green(),
                RecordStatus::Failed => line.status.as_str().red(),
                RecordStatus::Pending => line.status.as_str().yellow(),
            };
            match &line.error {
                Some(e) => println!(
                    "[{}] {} {}",
                    status,
                    line.display_name,
                    format!("({e})").dimmed()
                ),
                None => println!("[{}] {}", status, line.display_name),
            }
        }
        println!(
            "Total: {}  Success: {}  Failed: {}",
            self.total,
            self.succeeded.to_string().green(),
            self.failed.to_string().red()
        );
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
