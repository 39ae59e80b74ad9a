//! In-memory follow-up outbox shared by the actor implementations.

use serde::Serialize;
use std::sync::Mutex;

use crate::Record;

/// A message queued for a record after it was processed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FollowUp {
    pub record_id: String,
    pub display_name: String,
    pub message: String,
}

/// Best-effort queue. A poisoned lock drops the message with a warning.
#[derive(Debug, Default)]
pub struct Outbox {
    queued: Mutex<Vec<FollowUp>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, record: &Record, message: &str) {
        let item = FollowUp {
            record_id: record.id.clone(),
            display_name: record.display_name.clone(),
            message: message.to_string(),
        };
        match self.queued.lock() {
            Ok(mut q) => q.push(item),
            Err(_) => log::warn!(
                "follow-up for {} dropped (outbox unavailable)",
                record.display_name
            ),
        }
    }

    /// Copy of what has been queued so far.
    pub fn snapshot(&self) -> Vec<FollowUp> {
        self.queued.lock().map(|q| q.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.queued.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
