//! Shared fixtures: scripted actors and batch helpers.

#![allow(dead_code)]

use outreach::{Actor, ActorError, Batch, Record, SessionKind, TimeoutScope};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::ThreadId;
use std::time::Duration;

/// Actor whose behaviour per record id is fixed up front.
pub struct ScriptedActor {
    kind: SessionKind,
    fail_ids: HashSet<String>,
    hang_ids: HashSet<String>,
    panic_ids: HashSet<String>,
    stall_ids: HashMap<String, Duration>,
    followup_panic_ids: HashSet<String>,
    auth_fails: bool,
    work: Duration,
    pub auth_calls: AtomicUsize,
    pub process_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub followups: Mutex<Vec<String>>,
    pub call_threads: Mutex<HashSet<ThreadId>>,
}

impl ScriptedActor {
    pub fn new(kind: SessionKind) -> Self {
        Self {
            kind,
            fail_ids: HashSet::new(),
            hang_ids: HashSet::new(),
            panic_ids: HashSet::new(),
            stall_ids: HashMap::new(),
            followup_panic_ids: HashSet::new(),
            auth_fails: false,
            work: Duration::ZERO,
            auth_calls: AtomicUsize::new(0),
            process_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            followups: Mutex::new(Vec::new()),
            call_threads: Mutex::new(HashSet::new()),
        }
    }

    pub fn failing(mut self, ids: &[&str]) -> Self {
        self.fail_ids.extend(ids.iter().map(|s| s.to_string()));
        self
    }

    /// These ids never return and ignore their scope.
    pub fn hanging(mut self, ids: &[&str]) -> Self {
        self.hang_ids.extend(ids.iter().map(|s| s.to_string()));
        self
    }

    pub fn panicking(mut self, ids: &[&str]) -> Self {
        self.panic_ids.extend(ids.iter().map(|s| s.to_string()));
        self
    }

    /// These ids sleep for `dur` ignoring their scope, then succeed.
    pub fn stalling(mut self, ids: &[&str], dur: Duration) -> Self {
        self.stall_ids.extend(ids.iter().map(|s| (s.to_string(), dur)));
        self
    }

    pub fn panicking_followup(mut self, ids: &[&str]) -> Self {
        self.followup_panic_ids.extend(ids.iter().map(|s| s.to_string()));
        self
    }

    pub fn failing_auth(mut self) -> Self {
        self.auth_fails = true;
        self
    }

    /// Busy time per call (honours the scope).
    pub fn with_work(mut self, work: Duration) -> Self {
        self.work = work;
        self
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn process_calls(&self) -> usize {
        self.process_calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Distinct threads `process_one` ran on.
    pub fn call_thread_count(&self) -> usize {
        self.call_threads.lock().unwrap().len()
    }

    pub fn followup_ids(&self) -> Vec<String> {
        let mut ids = self.followups.lock().unwrap().clone();
        ids.sort();
        ids
    }
}

impl Actor for ScriptedActor {
    fn session_kind(&self) -> SessionKind {
        self.kind
    }

    fn authenticate(&self) -> Result<(), ActorError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        if self.auth_fails {
            return Err(ActorError::Authentication("bad credentials".into()));
        }
        Ok(())
    }

    fn process_one(&self, record: &Record, scope: &TimeoutScope) -> Result<(), ActorError> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.call_threads
            .lock()
            .unwrap()
            .insert(std::thread::current().id());

        if self.hang_ids.contains(&record.id) {
            loop {
                std::thread::sleep(Duration::from_secs(3600));
            }
        }
        if let Some(dur) = self.stall_ids.get(&record.id) {
            std::thread::sleep(*dur);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            return Ok(());
        }
        if self.panic_ids.contains(&record.id) {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            panic!("scripted panic for {}", record.id);
        }
        let result = scope.sleep(self.work).and_then(|_| {
            if self.fail_ids.contains(&record.id) {
                Err(ActorError::Remote(format!("scripted failure for {}", record.id)))
            } else {
                Ok(())
            }
        });
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn enqueue_followup(&self, record: &Record) {
        if self.followup_panic_ids.contains(&record.id) {
            panic!("scripted follow-up panic for {}", record.id);
        }
        self.followups.lock().unwrap().push(record.id.clone());
    }
}

/// `n` records with ids "1".."n".
pub fn batch_of(n: usize) -> Batch {
    (0..n)
        .map(|i| {
            Record::new(
                i,
                (i + 1).to_string(),
                format!("Lead {}", i + 1),
                format!("https://example.com/in/lead-{}", i + 1),
            )
        })
        .collect()
}

/// The three-record batch used throughout: ids 1, 2, 3 named A, B, C.
pub fn abc_batch() -> Batch {
    vec![
        Record::new(0, "1", "A", "https://example.com/in/a"),
        Record::new(1, "2", "B", "https://example.com/in/b"),
        Record::new(2, "3", "C", "https://example.com/in/c"),
    ]
}

pub const ABC_CSV: &str = "id,name,url\n\
1,A,https://example.com/in/a\n\
2,B,https://example.com/in/b\n\
3,C,https://example.com/in/c\n";

pub fn write_batch_file(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("leads.csv");
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn sorted_ids(report: &outreach::Report) -> Vec<String> {
    let mut ids: Vec<String> = report.lines.iter().map(|l| l.id.clone()).collect();
    ids.sort();
    ids
}
