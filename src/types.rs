//! Public and internal types for the outreach API and pipeline.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::config::{Defaults, PackagePaths};

/// Lifecycle state of a [`Record`]. Starts at `Pending`; a worker settles it exactly once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RecordStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

impl RecordStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RecordStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "Pending",
            RecordStatus::Success => "Success",
            RecordStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One target to process.
///
/// Owned by exactly one party at a time: the job queue, then one worker, then the result
/// channel. The worker is the only one that mutates it, via [`Record::settle`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Index in the batch as loaded. Used to sort the report; not part of the input row.
    pub position: usize,
    /// Caller-supplied id. Expected unique within a batch (not enforced).
    pub id: String,
    /// Name shown in logs and the report.
    pub display_name: String,
    /// Opaque target (e.g. a profile URL), passed to the actor verbatim.
    pub target_ref: String,
    status: RecordStatus,
    /// Cause of failure, set together with `Failed`.
    failure: Option<String>,
}

impl Record {
    pub fn new(
        position: usize,
        id: impl Into<String>,
        display_name: impl Into<String>,
        target_ref: impl Into<String>,
    ) -> Self {
        Self {
            position,
            id: id.into(),
            display_name: display_name.into(),
            target_ref: target_ref.into(),
            status: RecordStatus::Pending,
            failure: None,
        }
    }

    pub fn status(&self) -> RecordStatus {
        self.status
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Move from `Pending` to `Success` (when `failure` is None) or `Failed`.
    /// Returns false and leaves the record untouched if it was already settled.
    pub fn settle(&mut self, failure: Option<String>) -> bool {
        if self.status.is_terminal() {
            log::error!(
                "record {} ({}) settled twice; keeping {}",
                self.id,
                self.display_name,
                self.status
            );
            return false;
        }
        self.status = match failure {
            None => RecordStatus::Success,
            Some(_) => RecordStatus::Failed,
        };
        self.failure = failure;
        true
    }
}

/// Ordered records for one run. Read-only once loaded.
pub type Batch = Vec<Record>;

/// Full options (CLI, config file, library driver).
#[derive(Clone, Debug)]
pub struct Opts {
    /// Delimited file with a header row and `(id, display_name, target_ref)` rows.
    pub batch_path: PathBuf,
    /// Field delimiter for the batch file.
    pub delimiter: char,
    /// Route every actor call through the simulated actor (no network, no login).
    pub simulated: bool,
    /// Cosmetic; logged only. Kept so configs written for a headed browser session still load.
    pub visible_session: bool,
    /// Requested worker count. None uses the session policy default.
    pub workers: Option<usize>,
    /// Upper bound for one `process_one` call.
    pub per_record_timeout: Duration,
    /// Artificial delay per simulated call.
    pub simulated_delay: Duration,
    /// Record ids the simulated actor fails on purpose.
    pub simulated_failures: Vec<String>,
    /// Login form endpoint for the real session.
    pub login_url: Option<String>,
    /// Text queued for each successfully processed record.
    pub followup_message: String,
    /// Debug logging and a progress bar.
    pub verbose: bool,
    /// Print the report as JSON instead of text.
    pub json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            batch_path: PathBuf::from(PackagePaths::get().default_batch_filename()),
            delimiter: Defaults::DELIMITER,
            simulated: true,
            visible_session: false,
            workers: None,
            per_record_timeout: Defaults::PER_RECORD_TIMEOUT,
            simulated_delay: Duration::ZERO,
            simulated_failures: Vec::new(),
            login_url: None,
            followup_message: Defaults::FOLLOWUP_MESSAGE.to_string(),
            verbose: false,
            json: false,
        }
    }
}
