//! Real session over HTTP: cookie-holding client, form login, one GET per record.
//!
//! All remote calls go through `session`, a mutex held for the whole call. Workers already wait
//! for an abandoned call before issuing the next one; the lock also covers callers that drive
//! the actor outside the pool.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::blocking::Client;

use super::{Actor, ActorError, FollowUp, Outbox, SessionKind};
use crate::Record;
use crate::pipeline::TimeoutScope;
use crate::utils::Credentials;
use crate::utils::config::Defaults;

/// Form field names posted to the login endpoint.
const USERNAME_FIELD: &str = "username";
const PASSWORD_FIELD: &str = "password";

#[derive(Clone, Debug)]
pub struct HttpActorConfig {
    pub login_url: String,
    pub credentials: Credentials,
    pub followup_message: String,
}

pub struct HttpActor {
    client: Client,
    config: HttpActorConfig,
    session: Mutex<()>,
    authenticated: AtomicBool,
    outbox: Outbox,
}

impl HttpActor {
    /// Build the client. Fails if the TLS backend or cookie store cannot be initialised.
    pub fn new(config: HttpActorConfig) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .timeout(Defaults::LOGIN_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build HTTP session")?;
        Ok(Self {
            client,
            config,
            session: Mutex::new(()),
            authenticated: AtomicBool::new(false),
            outbox: Outbox::new(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Relaxed)
    }

    pub fn followups(&self) -> Vec<FollowUp> {
        self.outbox.snapshot()
    }
}

fn map_request_error(err: reqwest::Error, scope: &TimeoutScope) -> ActorError {
    if err.is_timeout() {
        ActorError::Timeout(scope.timeout())
    } else {
        ActorError::Remote(err.to_string())
    }
}

impl Actor for HttpActor {
    fn session_kind(&self) -> SessionKind {
        SessionKind::Real
    }

    fn authenticate(&self) -> Result<(), ActorError> {
        let _guard = self
            .session
            .lock()
            .map_err(|_| ActorError::Session("session lock poisoned".into()))?;
        info!("Attempting to log in at {}", self.config.login_url);
        let creds = &self.config.credentials;
        let resp = self
            .client
            .post(&self.config.login_url)
            .form(&[
                (USERNAME_FIELD, creds.username.as_str()),
                (PASSWORD_FIELD, creds.password.as_str()),
            ])
            .send()
            .map_err(|e| ActorError::Authentication(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ActorError::Authentication(format!("login returned HTTP {status}")));
        }
        self.authenticated.store(true, Ordering::Relaxed);
        info!("Login successful");
        Ok(())
    }

    fn process_one(&self, record: &Record, scope: &TimeoutScope) -> Result<(), ActorError> {
        let _guard = self
            .session
            .lock()
            .map_err(|_| ActorError::Session("session lock poisoned".into()))?;
        // Time spent waiting for the lock is part of this record's budget.
        scope.check()?;
        debug!("Visiting {} ({})", record.display_name, record.target_ref);
        let resp = self
            .client
            .get(&record.target_ref)
            .timeout(scope.remaining())
            .send()
            .map_err(|e| map_request_error(e, scope))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ActorError::Remote(format!("HTTP {status} for {}", record.target_ref)));
        }
        info!("Visited {}", record.display_name);
        Ok(())
    }

    fn enqueue_followup(&self, record: &Record) {
        // Outbox only; nothing is sent until the connection is accepted on the remote side.
        self.outbox.push(record, &self.config.followup_message);
        info!(
            "[QUEUE] Follow-up queued for {}: '{}'",
            record.display_name, self.config.followup_message
        );
    }
}
