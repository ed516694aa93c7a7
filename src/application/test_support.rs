//! In-memory stand-ins for the source and sink ports.
//!
//! Both fakes write to a shared [`Journal`] so tests can assert the exact
//! order in which sessions are opened, used and released.

use crate::domain::entities::Record;
use crate::domain::errors::{EtlError, Result};
use crate::ports::sink_port::{SinkPort, SinkSession, SinkTransaction};
use crate::ports::source_port::{SourcePort, SourceSession};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

enum SourceMode {
    Names(Vec<String>),
    FailConnect(String),
    FailRead(String),
}

pub struct FakeSource {
    mode: SourceMode,
    journal: Journal,
}

impl FakeSource {
    pub fn with_names(journal: &Journal, names: &[&str]) -> Self {
        Self {
            mode: SourceMode::Names(names.iter().map(|n| n.to_string()).collect()),
            journal: journal.clone(),
        }
    }

    pub fn failing_connect(journal: &Journal, reason: &str) -> Self {
        Self {
            mode: SourceMode::FailConnect(reason.to_string()),
            journal: journal.clone(),
        }
    }

    pub fn failing_read(journal: &Journal, reason: &str) -> Self {
        Self {
            mode: SourceMode::FailRead(reason.to_string()),
            journal: journal.clone(),
        }
    }
}

impl SourcePort for FakeSource {
    fn connect(&self) -> Result<Box<dyn SourceSession>> {
        let outcome = match &self.mode {
            SourceMode::FailConnect(reason) => {
                return Err(EtlError::SourceConnectError(reason.clone()))
            }
            SourceMode::FailRead(reason) => Err(reason.clone()),
            SourceMode::Names(names) => Ok(names.clone()),
        };
        self.journal.record("source:connect");
        Ok(Box::new(FakeSourceSession {
            outcome,
            journal: self.journal.clone(),
        }))
    }
}

struct FakeSourceSession {
    outcome: std::result::Result<Vec<String>, String>,
    journal: Journal,
}

impl SourceSession for FakeSourceSession {
    fn fetch_names(&mut self) -> Result<Vec<Record>> {
        match &self.outcome {
            Ok(names) => Ok(names.iter().map(Record::new).collect()),
            Err(reason) => Err(EtlError::SourceReadError(reason.clone())),
        }
    }
}

impl Drop for FakeSourceSession {
    fn drop(&mut self) {
        self.journal.record("source:close");
    }
}

#[derive(Default)]
struct SinkState {
    rows: Vec<String>,
    attempts: Vec<String>,
    connects: usize,
    commits: usize,
    rollbacks: usize,
    fail_connect: Option<String>,
    fail_on_insert: Option<usize>,
    fail_rollback: bool,
    fail_commit: bool,
}

/// A sink with a unique `name` column, mimicking `ON CONFLICT DO NOTHING`.
#[derive(Clone)]
pub struct FakeSink {
    state: Arc<Mutex<SinkState>>,
    journal: Journal,
}

impl FakeSink {
    pub fn new(journal: &Journal) -> Self {
        Self {
            state: Arc::default(),
            journal: journal.clone(),
        }
    }

    pub fn seeded(self, rows: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .rows
            .extend(rows.iter().map(|r| r.to_string()));
        self
    }

    pub fn failing_connect(self, reason: &str) -> Self {
        self.state.lock().unwrap().fail_connect = Some(reason.to_string());
        self
    }

    /// Fails the `n`th insert attempt (1-based).
    pub fn failing_insert(self, n: usize) -> Self {
        self.state.lock().unwrap().fail_on_insert = Some(n);
        self
    }

    pub fn failing_rollback(self) -> Self {
        self.state.lock().unwrap().fail_rollback = true;
        self
    }

    pub fn failing_commit(self) -> Self {
        self.state.lock().unwrap().fail_commit = true;
        self
    }

    pub fn rows(&self) -> Vec<String> {
        self.state.lock().unwrap().rows.clone()
    }

    pub fn insert_attempts(&self) -> Vec<String> {
        self.state.lock().unwrap().attempts.clone()
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub fn commits(&self) -> usize {
        self.state.lock().unwrap().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.state.lock().unwrap().rollbacks
    }
}

impl SinkPort for FakeSink {
    fn connect(&self) -> Result<Box<dyn SinkSession>> {
        let mut state = self.state.lock().unwrap();
        state.connects += 1;
        if let Some(reason) = &state.fail_connect {
            return Err(EtlError::SinkConnectError(reason.clone()));
        }
        self.journal.record("sink:connect");
        Ok(Box::new(FakeSinkSession {
            sink: self.clone(),
        }))
    }
}

struct FakeSinkSession {
    sink: FakeSink,
}

impl SinkSession for FakeSinkSession {
    fn begin(&mut self) -> Result<Box<dyn SinkTransaction + '_>> {
        self.sink.journal.record("sink:begin");
        Ok(Box::new(FakeTransaction {
            sink: self.sink.clone(),
            pending: Vec::new(),
        }))
    }
}

impl Drop for FakeSinkSession {
    fn drop(&mut self) {
        self.sink.journal.record("sink:close");
    }
}

struct FakeTransaction {
    sink: FakeSink,
    pending: Vec<String>,
}

impl SinkTransaction for FakeTransaction {
    fn insert_name(&mut self, name: &str) -> Result<u64> {
        self.sink.journal.record(format!("insert:{}", name));
        let mut state = self.sink.state.lock().unwrap();
        state.attempts.push(name.to_string());
        let attempt = state.attempts.len();
        if state.fail_on_insert == Some(attempt) {
            return Err(EtlError::SinkWriteError(format!(
                "insert #{} rejected",
                attempt
            )));
        }
        let exists = state.rows.iter().chain(self.pending.iter()).any(|r| r == name);
        if exists {
            Ok(0)
        } else {
            self.pending.push(name.to_string());
            Ok(1)
        }
    }

    fn commit(mut self: Box<Self>) -> Result<()> {
        self.sink.journal.record("commit");
        let pending = std::mem::take(&mut self.pending);
        let mut state = self.sink.state.lock().unwrap();
        if state.fail_commit {
            return Err(EtlError::SinkWriteError(
                "could not serialize access".to_string(),
            ));
        }
        state.commits += 1;
        state.rows.extend(pending);
        Ok(())
    }

    fn rollback(self: Box<Self>) -> Result<()> {
        self.sink.journal.record("rollback");
        let mut state = self.sink.state.lock().unwrap();
        state.rollbacks += 1;
        if state.fail_rollback {
            return Err(EtlError::SinkWriteError("connection lost".to_string()));
        }
        Ok(())
    }
}

impl Drop for FakeTransaction {
    fn drop(&mut self) {
        self.sink.journal.record("sink:cursor-close");
    }
}
