//! Worker pool: take a record from the job queue, run the actor under a per-record timeout,
//! settle the status, hand the record to the result channel.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use log::{debug, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::Record;
use crate::actor::{Actor, ActorError};
use crate::engine::progress::{ProgressBar, update_progress_bar};

use super::context::PoolConfig;
use super::error_handler::report_record_failure;
use super::scope::{RunScope, TimeoutScope};

type CallResult = Result<(), ActorError>;

/// What each worker needs besides its channel ends.
#[derive(Clone)]
pub struct WorkerContext {
    pub actor: Arc<dyn Actor>,
    pub scope: RunScope,
    pub pool: PoolConfig,
    pub progress: Option<ProgressBar>,
}

/// Helper thread that runs actor calls one at a time for a single worker.
struct CallRunner {
    job_tx: Sender<(Record, TimeoutScope)>,
    done_rx: Receiver<CallResult>,
    /// An abandoned call is still running here and its result has not been received.
    in_flight: bool,
}

impl CallRunner {
    fn spawn(actor: &Arc<dyn Actor>, name: &str) -> std::io::Result<Self> {
        let (job_tx, job_rx) = bounded::<(Record, TimeoutScope)>(1);
        let (done_tx, done_rx) = bounded::<CallResult>(1);
        let actor = Arc::clone(actor);
        thread::Builder::new().name(name.to_string()).spawn(move || {
            while let Ok((record, scope)) = job_rx.recv() {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    actor.process_one(&record, &scope)
                }))
                .unwrap_or(Err(ActorError::Panicked));
                // Receiver is gone once the worker replaced this runner.
                if done_tx.send(result).is_err() {
                    break;
                }
            }
        })?;
        Ok(Self {
            job_tx,
            done_rx,
            in_flight: false,
        })
    }
}

/// Runs actor calls for one worker under per-record child scopes.
///
/// Calls go to a reused helper thread and the worker waits at most until the child's deadline.
/// A call that misses it is abandoned and the record fails on time. For a simulated session
/// the helper is detached and a fresh one started for the next call. For a real session the
/// helper is kept: the next call first waits, within its own deadline, for the abandoned one to
/// finish, so the session never sees two calls at once. A panicking actor fails only its record.
pub struct ActorCaller {
    actor: Arc<dyn Actor>,
    name: String,
    runner: Option<CallRunner>,
    abandoned: usize,
}

impl ActorCaller {
    pub fn new(actor: Arc<dyn Actor>, name: impl Into<String>) -> Self {
        Self {
            actor,
            name: name.into(),
            runner: None,
            abandoned: 0,
        }
    }

    /// Calls given up on after their deadline.
    pub fn abandoned(&self) -> usize {
        self.abandoned
    }

    /// The current helper, started on first use or after the previous one was detached.
    fn runner(&mut self) -> Result<&mut CallRunner, ActorError> {
        if self.runner.is_none() {
            let runner = CallRunner::spawn(&self.actor, &self.name)
                .map_err(|e| ActorError::Session(format!("could not start actor call: {e}")))?;
            self.runner = Some(runner);
        }
        self.runner
            .as_mut()
            .ok_or_else(|| ActorError::Session("actor call thread unavailable".into()))
    }

    /// Wait for an abandoned call still holding the helper. `Err` if it outlives `call_scope`.
    fn drain_abandoned(&mut self, call_scope: &TimeoutScope) -> CallResult {
        let Some(runner) = self.runner.as_mut() else {
            return Ok(());
        };
        if !runner.in_flight {
            return Ok(());
        }
        match runner.done_rx.recv_timeout(call_scope.remaining()) {
            Ok(late) => {
                debug!("{}: late result of abandoned call discarded: {:?}", self.name, late);
                runner.in_flight = false;
                Ok(())
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!("{}: previous call still holds the session", self.name);
                Err(ActorError::Timeout(call_scope.timeout()))
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.runner = None;
                Ok(())
            }
        }
    }

    /// Run one actor call for `record` under a child scope of `scope`.
    pub fn call(&mut self, record: &Record, scope: &RunScope, pool: &PoolConfig) -> CallResult {
        if scope.is_cancelled() {
            return Err(ActorError::Cancelled);
        }
        let call_scope = scope.child(pool.per_record_timeout());
        self.drain_abandoned(&call_scope)?;

        let runner = self.runner()?;
        if runner
            .job_tx
            .send((record.clone(), call_scope.clone()))
            .is_err()
        {
            self.runner = None;
            return Err(ActorError::Panicked);
        }

        match runner.done_rx.recv_timeout(call_scope.remaining()) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                if pool.session_kind().is_real() {
                    runner.in_flight = true;
                } else {
                    // Detach; the helper exits once the stuck call returns.
                    self.runner = None;
                }
                self.abandoned += 1;
                Err(ActorError::Timeout(call_scope.timeout()))
            }
            Err(RecvTimeoutError::Disconnected) => {
                self.runner = None;
                Err(ActorError::Panicked)
            }
        }
    }
}

/// Single worker: runs until the job queue is closed and drained.
fn worker_loop(
    worker_id: usize,
    job_rx: Receiver<Record>,
    result_tx: Sender<Record>,
    ctx: WorkerContext,
) {
    let mut caller = ActorCaller::new(Arc::clone(&ctx.actor), format!("actor-call-{worker_id}"));
    let mut handled = 0_usize;
    while let Ok(mut record) = job_rx.recv() {
        match caller.call(&record, &ctx.scope, &ctx.pool) {
            Ok(()) => {
                let queued =
                    panic::catch_unwind(AssertUnwindSafe(|| ctx.actor.enqueue_followup(&record)));
                if queued.is_err() {
                    warn!("worker {}: follow-up for {} panicked", worker_id, record.display_name);
                }
                record.settle(None);
            }
            Err(err) => {
                report_record_failure(worker_id, &record, &err);
                record.settle(Some(err.to_string()));
            }
        }
        handled += 1;
        if let Some(pb) = ctx.progress.as_ref() {
            update_progress_bar(pb, 1);
        }
        // Capacity equals the batch size, so this never blocks.
        if result_tx.send(record).is_err() {
            break;
        }
    }
    debug!(
        "worker {}: queue closed after {} record(s), {} call(s) abandoned",
        worker_id,
        handled,
        caller.abandoned()
    );
    drop(result_tx);
}

/// Spawn `num_workers` workers sharing `job_rx` and `result_tx`. The caller must drop its own
/// `result_tx` after this so the result channel closes once every worker exits.
pub fn spawn_workers(
    job_rx: Receiver<Record>,
    result_tx: &Sender<Record>,
    ctx: &WorkerContext,
    num_workers: usize,
) -> std::io::Result<Vec<JoinHandle<()>>> {
    (1..=num_workers)
        .map(|worker_id| {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            let ctx = ctx.clone();
            thread::Builder::new()
                .name(format!("worker-{worker_id}"))
                .spawn(move || worker_loop(worker_id, job_rx, result_tx, ctx))
        })
        .collect()
}
