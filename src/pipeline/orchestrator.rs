use log::{debug, error};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::Batch;
use crate::actor::Actor;
use crate::engine::progress::ProgressBar;
use crate::report::{Report, aggregate};

use super::context::{PipelineChannels, PipelineHandles, PoolConfig, create_pipeline_channels};
use super::error_handler::RunError;
use super::feed::feed_jobs;
use super::scope::RunScope;
use super::worker::{WorkerContext, spawn_workers};

/// Start the worker pool and feed it `batch`. Returns once every record has been offered and the
/// job queue is closed; the caller joins `worker_handles` and then drains `result_rx`.
pub fn run_pipeline(
    batch: Batch,
    actor: Arc<dyn Actor>,
    pool: &PoolConfig,
    scope: &RunScope,
    progress: Option<ProgressBar>,
) -> Result<PipelineHandles, RunError> {
    let batch_len = batch.len();
    let num_workers = pool.effective_workers(batch_len);
    if num_workers < pool.worker_count() {
        debug!(
            "Capping workers {} -> {} (batch size)",
            pool.worker_count(),
            num_workers
        );
    }

    let PipelineChannels {
        job_tx,
        job_rx,
        result_tx,
        result_rx,
    } = create_pipeline_channels(batch_len);

    let ctx = WorkerContext {
        actor,
        scope: scope.clone(),
        pool: *pool,
        progress,
    };
    let worker_handles =
        spawn_workers(job_rx, &result_tx, &ctx, num_workers).map_err(RunError::WorkerSpawn)?;
    // Dropping our sender leaves the workers' clones as the only ones; the result channel
    // closes when the last worker exits.
    drop(result_tx);

    let dispatched = feed_jobs(job_tx, batch);
    debug!(
        "Dispatched {} record(s) to {} worker(s); job queue closed",
        dispatched, num_workers
    );

    Ok(PipelineHandles {
        result_rx,
        worker_handles,
        dispatched,
    })
}

/// Completion barrier: join every worker. All are joined even if one panicked; the first
/// panic is returned.
pub fn wait_for_workers(worker_handles: Vec<JoinHandle<()>>) -> Result<(), RunError> {
    let mut first_panic = None;
    for (i, h) in worker_handles.into_iter().enumerate() {
        if h.join().is_err() {
            error!("worker {} panicked", i + 1);
            if first_panic.is_none() {
                first_panic = Some(RunError::WorkerPanicked(i + 1));
            }
        }
    }
    match first_panic {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Main orchestrator: batch → job queue → workers → result channel → report.
/// The report is built only after every worker has exited, so it never sees a partial set.
pub fn collect_report(
    batch: Batch,
    actor: Arc<dyn Actor>,
    pool: &PoolConfig,
    scope: &RunScope,
    progress: Option<ProgressBar>,
) -> Result<Report, RunError> {
    let PipelineHandles {
        result_rx,
        worker_handles,
        dispatched,
    } = run_pipeline(batch, actor, pool, scope, progress)?;

    wait_for_workers(worker_handles)?;

    let report = aggregate(result_rx);
    if report.total != dispatched {
        error!(
            "dispatched {} record(s) but {} reached the report",
            dispatched, report.total
        );
    }
    debug!("main: result channel closed, {} record(s) aggregated", report.total);
    Ok(report)
}
