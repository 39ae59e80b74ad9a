//! Pipeline driver: one end-to-end run.
//!
//! Session → pool validation → authentication (real sessions) → batch load → worker pool →
//! report. Every step before the pool is a fatal boundary: no record is dispatched unless all of
//! them succeed.

use anyhow::Result;
use log::info;
use std::sync::Arc;

use crate::Opts;
use crate::actor::{Actor, SessionKind, open_session};
use crate::batch::load_batch;
use crate::engine::progress::{finish_progress_bar, setup_progress};
use crate::pipeline::{PoolConfig, RunError, RunScope, collect_report};
use crate::report::Report;

/// Real sessions log in before any record is processed; simulated ones skip it.
pub fn requires_authentication(kind: SessionKind) -> bool {
    kind.is_real()
}

/// Open the session described by `opts` and run the batch.
pub fn run(opts: &Opts, scope: &RunScope) -> Result<Report> {
    let actor = open_session(opts).map_err(|e| RunError::Session(format!("{e:#}")))?;
    run_with_actor(actor, opts, scope)
}

/// Run the batch through an already created session.
pub fn run_with_actor(actor: Arc<dyn Actor>, opts: &Opts, scope: &RunScope) -> Result<Report> {
    let kind = actor.session_kind();
    let pool = PoolConfig::for_session(kind, opts.workers, opts.per_record_timeout)?;

    if requires_authentication(kind) {
        info!("Authenticating session...");
        actor.authenticate().map_err(RunError::Authentication)?;
    }

    let batch = load_batch(&opts.batch_path, opts.delimiter)?;
    info!(
        "Loaded {} record(s) from {}; {} worker(s), {:?} per record",
        batch.len(),
        opts.batch_path.display(),
        pool.effective_workers(batch.len()),
        pool.per_record_timeout()
    );

    let progress = setup_progress(opts.verbose && !opts.json, batch.len());
    let report = collect_report(batch, actor, &pool, scope, progress.clone())?;
    if let Some(pb) = progress.as_ref() {
        finish_progress_bar(pb);
    }
    info!(
        "Run complete: {} succeeded, {} failed",
        report.succeeded, report.failed
    );
    Ok(report)
}
