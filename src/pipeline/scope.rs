//! Run scope and per-record timeout scopes.
//!
//! One [`RunScope`] per run carries the cancel flag. Each actor call gets a [`TimeoutScope`]
//! derived from it: the child sees the parent's cancellation, but has its own deadline, so one
//! record expiring never touches its siblings or the run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::actor::ActorError;
use crate::utils::config::Defaults;

/// Cancellable lifetime of one pipeline run. Cheap to clone; clones share the flag.
#[derive(Clone, Debug, Default)]
pub struct RunScope {
    cancelled: Arc<AtomicBool>,
}

impl RunScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop issuing new actor calls. In-flight calls see it through their child scope.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Flag for signal handlers (ctrlc) that cannot hold the scope itself.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Child scope for one actor call, expiring `timeout` from now.
    pub fn child(&self, timeout: Duration) -> TimeoutScope {
        let started = Instant::now();
        TimeoutScope {
            cancelled: Arc::clone(&self.cancelled),
            started,
            deadline: started + timeout,
            timeout,
        }
    }
}

/// Bounded sub-lifetime for a single actor call.
#[derive(Clone, Debug)]
pub struct TimeoutScope {
    cancelled: Arc<AtomicBool>,
    started: Instant,
    deadline: Instant,
    timeout: Duration,
}

impl TimeoutScope {
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left before the deadline (zero once expired).
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.is_expired()
    }

    /// `Err` once the run was cancelled or the deadline passed. Cancellation wins.
    pub fn check(&self) -> Result<(), ActorError> {
        if self.is_cancelled() {
            return Err(ActorError::Cancelled);
        }
        if self.is_expired() {
            return Err(ActorError::Timeout(self.timeout));
        }
        Ok(())
    }

    /// Sleep for `dur`, waking early (with `Err`) if the scope ends first.
    pub fn sleep(&self, dur: Duration) -> Result<(), ActorError> {
        let until = Instant::now() + dur;
        loop {
            self.check()?;
            let now = Instant::now();
            if now >= until {
                return Ok(());
            }
            let step = (until - now)
                .min(self.remaining())
                .min(Defaults::POLL_INTERVAL);
            std::thread::sleep(step);
        }
    }
}
