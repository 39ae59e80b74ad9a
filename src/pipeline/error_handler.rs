use log::warn;
use std::path::PathBuf;

use crate::Record;
use crate::actor::ActorError;

/// Run-abort errors. Any of these ends the run before (or instead of) producing a report.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("could not establish actor session: {0}")]
    Session(String),

    #[error("authentication failed, aborting run: {0}")]
    Authentication(#[source] ActorError),

    #[error("could not load batch from {}: {source}", path.display())]
    BatchLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),

    #[error("could not start worker pool: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("worker thread {0} panicked")]
    WorkerPanicked(usize),
}

/// Log a per-record failure. The error stops here; the worker moves on to the next record.
pub fn report_record_failure(worker_id: usize, record: &Record, err: &ActorError) {
    warn!(
        "Worker {} failed on {} (id {}): {}",
        worker_id, record.display_name, record.id, err
    );
}
