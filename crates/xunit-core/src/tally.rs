//! Tally - the outcome aggregator for one run

use serde::Serialize;
use std::fmt;

/// Lifecycle phase a fault was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    SetUp,
    Test,
    TearDown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::SetUp => "set_up",
            Phase::Test => "test",
            Phase::TearDown => "tear_down",
        };
        f.write_str(name)
    }
}

/// Details recorded alongside a failure or error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Name of the behavior that produced this diagnostic
    pub test: String,
    /// Phase the fault was raised in
    pub phase: Phase,
    /// Human-readable description of the fault
    pub message: String,
    /// Source location (assertion call site), if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Captured backtrace, if the runtime provided one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backtrace: Option<String>,
}

impl Diagnostic {
    pub fn new(test: impl Into<String>, phase: Phase, message: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            phase,
            message: message.into(),
            location: None,
            backtrace: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_backtrace(mut self, backtrace: impl Into<String>) -> Self {
        self.backtrace = Some(backtrace.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.test)?;
        if self.phase != Phase::Test {
            write!(f, "[{}] ", self.phase)?;
        }
        f.write_str(&self.message)?;
        if let Some(location) = &self.location {
            write!(f, " (at {})", location)?;
        }
        Ok(())
    }
}

/// One recorded failure or error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Identifier of the test case, its behavior name
    pub test: String,
    pub diagnostic: Diagnostic,
}

/// Accumulates started counts, failures, and errors across a run.
///
/// A tally only grows. Start a new run with a new tally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    run_count: usize,
    failures: Vec<Entry>,
    errors: Vec<Entry>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more started test case
    pub fn record_started(&mut self) {
        self.run_count += 1;
    }

    /// Record a failed expectation. Identifiers need not be unique.
    pub fn record_failure(&mut self, test: impl Into<String>, diagnostic: Diagnostic) {
        self.failures.push(Entry {
            test: test.into(),
            diagnostic,
        });
    }

    /// Record an unexpected error. Identifiers need not be unique.
    pub fn record_error(&mut self, test: impl Into<String>, diagnostic: Diagnostic) {
        self.errors.push(Entry {
            test: test.into(),
            diagnostic,
        });
    }

    pub fn run_count(&self) -> usize {
        self.run_count
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Failures in the order they were recorded
    pub fn failures(&self) -> &[Entry] {
        &self.failures
    }

    /// Errors in the order they were recorded
    pub fn errors(&self) -> &[Entry] {
        &self.errors
    }

    /// True when nothing failed and nothing errored
    pub fn was_successful(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }

    /// `"<run> run, <failed> failed, <errors> error"`
    pub fn summary(&self) -> String {
        format!(
            "{} run, {} failed, {} error",
            self.run_count,
            self.failures.len(),
            self.errors.len()
        )
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}
