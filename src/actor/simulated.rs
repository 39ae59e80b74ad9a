//! Simulated actor: deterministic, near-instant success with no external side effects.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use log::{debug, info};

use super::{Actor, ActorError, FollowUp, Outbox, SessionKind};
use crate::Record;
use crate::pipeline::TimeoutScope;
use crate::utils::config::Defaults;

/// Stand-in session for exercising the pipeline without a remote endpoint.
///
/// Every call succeeds unless the record id was registered with [`Self::with_failures`].
/// An optional delay is slept inside the call's scope, so it still honours timeouts.
#[derive(Debug)]
pub struct SimulatedActor {
    delay: Duration,
    fail_ids: HashSet<String>,
    followup_message: String,
    outbox: Outbox,
    auth_calls: AtomicUsize,
    process_calls: AtomicUsize,
}

impl Default for SimulatedActor {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedActor {
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
            fail_ids: HashSet::new(),
            followup_message: Defaults::FOLLOWUP_MESSAGE.to_string(),
            outbox: Outbox::new(),
            auth_calls: AtomicUsize::new(0),
            process_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_failures<I: IntoIterator<Item = String>>(mut self, ids: I) -> Self {
        self.fail_ids.extend(ids);
        self
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::Relaxed)
    }

    pub fn process_calls(&self) -> usize {
        self.process_calls.load(Ordering::Relaxed)
    }

    pub fn followups(&self) -> Vec<FollowUp> {
        self.outbox.snapshot()
    }
}

impl Actor for SimulatedActor {
    fn session_kind(&self) -> SessionKind {
        SessionKind::Simulated
    }

    fn authenticate(&self) -> Result<(), ActorError> {
        self.auth_calls.fetch_add(1, Ordering::Relaxed);
        info!("[SIM] Logged in");
        Ok(())
    }

    fn process_one(&self, record: &Record, scope: &TimeoutScope) -> Result<(), ActorError> {
        self.process_calls.fetch_add(1, Ordering::Relaxed);
        if !self.delay.is_zero() {
            scope.sleep(self.delay)?;
        }
        scope.check()?;
        if self.fail_ids.contains(&record.id) {
            return Err(ActorError::Remote(format!(
                "simulated failure for id {}",
                record.id
            )));
        }
        debug!("[SIM] Visited {} ({})", record.display_name, record.target_ref);
        Ok(())
    }

    fn enqueue_followup(&self, record: &Record) {
        self.outbox.push(record, &self.followup_message);
        debug!("[SIM] Follow-up queued for {}", record.display_name);
    }
}
