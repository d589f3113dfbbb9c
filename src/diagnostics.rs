//! Diagnostic output for state machines.
//!
//! The machine reports what it does (registrations, rejected calls, callback
//! invocations) to a [`DiagnosticSink`]. Sinks only observe: nothing they do
//! changes what an operation returns.
//!
//! - [`TracingSink`] forwards every record to the `tracing` macros and is
//!   the default.
//! - [`RecordingSink`] keeps records in memory so callers and tests can
//!   inspect them.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Identifies one machine instance in diagnostic output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineId(Uuid);

impl MachineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MachineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Severity of a diagnostic record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// One diagnostic emitted by a machine.
#[derive(Clone, Copy, Debug)]
pub struct Diagnostic<'a> {
    pub machine: MachineId,
    pub level: Level,
    /// Machine operation that produced the record, e.g. `"add_state"`.
    pub operation: &'a str,
    pub message: &'a str,
}

/// Write-only observer for machine diagnostics.
pub trait DiagnosticSink {
    fn record(&self, diagnostic: &Diagnostic<'_>);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Rc<T> {
    fn record(&self, diagnostic: &Diagnostic<'_>) {
        (**self).record(diagnostic)
    }
}

/// Sink that forwards records to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, d: &Diagnostic<'_>) {
        let machine = d.machine;
        let operation = d.operation;
        match d.level {
            Level::Debug => tracing::debug!(%machine, operation, "{}", d.message),
            Level::Info => tracing::info!(%machine, operation, "{}", d.message),
            Level::Warning => tracing::warn!(%machine, operation, "{}", d.message),
            Level::Error => tracing::error!(%machine, operation, "{}", d.message),
        }
    }
}

/// An owned copy of a [`Diagnostic`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub machine: MachineId,
    pub level: Level,
    pub operation: String,
    pub message: String,
}

/// Sink that stores every record in memory.
///
/// Clones share the same buffer, so a caller can hand one clone to a
/// machine and keep another to read from.
///
/// # Example
///
/// ```rust
/// use switchyard::{Level, RecordingSink, StateMachine};
///
/// let sink = RecordingSink::new();
/// let mut machine = StateMachine::builder().sink(sink.clone()).build();
///
/// machine.add_state("Idle").unwrap();
/// assert!(machine.add_state("Idle").is_err());
///
/// assert_eq!(sink.count(Level::Warning), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    records: Rc<RefCell<Vec<Record>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<Record> {
        self.records.borrow().clone()
    }

    /// Number of records at exactly `level`.
    pub fn count(&self, level: Level) -> usize {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.level == level)
            .count()
    }

    /// Records at exactly `level`.
    pub fn at_level(&self, level: Level) -> Vec<Record> {
        self.records
            .borrow()
            .iter()
            .filter(|r| r.level == level)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&self, d: &Diagnostic<'_>) {
        self.records.borrow_mut().push(Record {
            machine: d.machine,
            level: d.level,
            operation: d.operation.to_string(),
            message: d.message.to_string(),
        });
    }
}
