//! Actor: the external capability that performs the remote action for each record.
//!
//! The pipeline only sees [`Actor`]. One session handle (`Arc<dyn Actor>`) is shared by all
//! workers, so implementations that wrap a live remote session must serialize their own calls.
//! Configuration validation additionally limits real sessions to one worker
//! (see [`PoolConfig`](crate::pipeline::PoolConfig)).

pub mod followup;
pub mod http;
pub mod simulated;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::Opts;
use crate::Record;
use crate::pipeline::TimeoutScope;
use crate::utils::get_credentials;

pub use followup::{FollowUp, Outbox};
pub use http::{HttpActor, HttpActorConfig};
pub use simulated::SimulatedActor;

/// Whether a session talks to the outside world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionKind {
    /// Live remote session. Not proven safe under concurrent use: one worker only, and that
    /// worker never starts a call while an abandoned one is still running.
    Real,
    /// No external effects. Any worker count.
    Simulated,
}

impl SessionKind {
    pub fn is_real(&self) -> bool {
        matches!(self, SessionKind::Real)
    }
}

/// Per-record or session failure reported by an actor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorError {
    #[error("session unavailable: {0}")]
    Session(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("remote action failed: {0}")]
    Remote(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("run cancelled")]
    Cancelled,

    #[error("actor call panicked")]
    Panicked,
}

/// Capability interface consumed by the pipeline.
pub trait Actor: Send + Sync {
    fn session_kind(&self) -> SessionKind;

    /// Establish the session. Called at most once per run, before any record is dispatched.
    fn authenticate(&self) -> Result<(), ActorError>;

    /// Perform the remote action for one record.
    ///
    /// Must respect `scope`: return promptly once [`TimeoutScope::is_done`] is true. The worker
    /// stops waiting at the deadline regardless, so a call that overruns is abandoned and its
    /// result discarded.
    fn process_one(&self, record: &Record, scope: &TimeoutScope) -> Result<(), ActorError>;

    /// Queue the follow-up message for a record that was processed successfully.
    ///
    /// Best effort: no return value, no retry, no delivery guarantee. Must not block on the
    /// remote side. A lost follow-up never changes the record's status.
    fn enqueue_followup(&self, record: &Record);
}

/// Create the shared session for a run from `opts`: simulated, or an HTTP session with
/// credentials from env / `.env` / prompt. Failure here aborts the run.
pub fn open_session(opts: &Opts) -> Result<Arc<dyn Actor>> {
    if opts.visible_session {
        log::debug!("visible_session is set; it has no effect on a non-browser session");
    }
    if opts.simulated {
        log::info!("Simulated session: no network calls will be made");
        let actor = SimulatedActor::new()
            .with_delay(opts.simulated_delay)
            .with_failures(opts.simulated_failures.iter().cloned());
        return Ok(Arc::new(actor));
    }

    let login_url = opts
        .login_url
        .clone()
        .ok_or_else(|| anyhow::anyhow!("login_url is required for a real session"))?;
    let dir = opts
        .batch_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let credentials = get_credentials(dir)?;
    let actor = HttpActor::new(HttpActorConfig {
        login_url,
        credentials,
        followup_message: opts.followup_message.clone(),
    })?;
    Ok(Arc::new(actor))
}
