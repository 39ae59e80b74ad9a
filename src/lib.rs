//! Outreach: drive a batch of target records through a shared remote session with a bounded
//! worker pool, per-record timeouts and a final status report.

pub mod actor;
pub mod batch;
pub mod engine;
pub mod pipeline;
pub mod report;
pub mod run;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use actor::{Actor, ActorError, SessionKind, SimulatedActor};
pub use pipeline::{PoolConfig, RunError, RunScope, TimeoutScope};
pub use report::{Report, ReportLine};
pub use run::{run, run_with_actor};

use std::sync::Arc;

/// Result alias used by public outreach API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Core entry point for library callers: process an already loaded `batch` through `actor` and
/// return the report. No authentication and no file I/O; see [`run`] for the full driver.
///
/// ```ignore
/// let actor = Arc::new(SimulatedActor::new());
/// let pool = PoolConfig::for_session(actor.session_kind(), Some(3), Duration::from_secs(30))?;
/// let report = outreach::run_batch(actor, batch, &pool, &RunScope::new())?;
/// ```
pub fn run_batch(
    actor: Arc<dyn Actor>,
    batch: Batch,
    pool: &PoolConfig,
    scope: &RunScope,
) -> std::result::Result<Report, RunError> {
    pipeline::collect_report(batch, actor, pool, scope, None)
}
