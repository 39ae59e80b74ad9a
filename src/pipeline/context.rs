//! Pool configuration and the channels/handles that wire the pipeline together.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::Record;
use crate::actor::SessionKind;
use crate::utils::config::WorkerLimits;

use super::error_handler::RunError;

/// Validated pool settings. Only constructible through [`PoolConfig::new`] or
/// [`PoolConfig::for_session`], so a real session can never be paired with more than one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    worker_count: usize,
    per_record_timeout: Duration,
    session_kind: SessionKind,
}

impl PoolConfig {
    /// Validate an explicit worker count against the session kind.
    pub fn new(
        worker_count: usize,
        per_record_timeout: Duration,
        session_kind: SessionKind,
    ) -> Result<Self, RunError> {
        if worker_count == 0 {
            return Err(RunError::InvalidConfig(
                "worker count must be at least 1".into(),
            ));
        }
        if per_record_timeout.is_zero() {
            return Err(RunError::InvalidConfig(
                "per-record timeout must be greater than zero".into(),
            ));
        }
        let limits = WorkerLimits::default();
        if session_kind.is_real() && worker_count > limits.real {
            return Err(RunError::InvalidConfig(format!(
                "a real session supports {} worker(s), {} requested",
                limits.real, worker_count
            )));
        }
        Ok(Self {
            worker_count,
            per_record_timeout,
            session_kind,
        })
    }

    /// Derive the worker count from the session kind: real sessions get exactly one worker,
    /// simulated ones get `requested` or the default.
    pub fn for_session(
        session_kind: SessionKind,
        requested: Option<usize>,
        per_record_timeout: Duration,
    ) -> Result<Self, RunError> {
        let limits = WorkerLimits::default();
        let worker_count = match (session_kind, requested) {
            (_, Some(n)) => n,
            (SessionKind::Real, None) => limits.real,
            (SessionKind::Simulated, None) => limits.simulated_default,
        };
        Self::new(worker_count, per_record_timeout, session_kind)
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    pub fn per_record_timeout(&self) -> Duration {
        self.per_record_timeout
    }

    pub fn session_kind(&self) -> SessionKind {
        self.session_kind
    }

    /// Workers actually spawned for a batch of `batch_len`: never more than there are records,
    /// never fewer than one.
    pub fn effective_workers(&self, batch_len: usize) -> usize {
        self.worker_count.min(batch_len).max(1)
    }
}

/// Job queue and result channel, both sized to the batch so no send ever blocks.
pub struct PipelineChannels {
    pub job_tx: Sender<Record>,
    pub job_rx: Receiver<Record>,
    pub result_tx: Sender<Record>,
    pub result_rx: Receiver<Record>,
}

/// Capacity for a batch of `batch_len`. A zero-capacity crossbeam channel is a rendezvous
/// channel, so keep at least one slot.
pub fn channel_cap(batch_len: usize) -> usize {
    batch_len.max(1)
}

pub fn create_pipeline_channels(batch_len: usize) -> PipelineChannels {
    let cap = channel_cap(batch_len);
    let (job_tx, job_rx) = bounded::<Record>(cap);
    let (result_tx, result_rx) = bounded::<Record>(cap);
    PipelineChannels {
        job_tx,
        job_rx,
        result_tx,
        result_rx,
    }
}

/// Handles returned by [`run_pipeline`](super::run_pipeline): the caller joins `worker_handles`
/// (the completion barrier) and only then drains `result_rx`.
pub struct PipelineHandles {
    pub result_rx: Receiver<Record>,
    pub worker_handles: Vec<JoinHandle<()>>,
    /// Records offered to the job queue.
    pub dispatched: usize,
}
