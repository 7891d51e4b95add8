//! Test runner - run a test against a fresh tally and report its summary

use crate::suite::Test;
use crate::tally::Tally;
use tracing::{info, info_span};

/// Receives the summary line of each run
pub trait SummarySink {
    fn emit(&mut self, summary: &str);
}

impl<F: FnMut(&str)> SummarySink for F {
    fn emit(&mut self, summary: &str) {
        self(summary)
    }
}

/// Default sink: logs the summary through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl SummarySink for LogSink {
    fn emit(&mut self, summary: &str) {
        info!(summary, "test run finished");
    }
}

/// Runs tests and hands each summary to a [`SummarySink`]
pub struct TestRunner {
    sink: Box<dyn SummarySink>,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    /// Create a runner that logs summaries
    pub fn new() -> Self {
        Self::with_sink(LogSink)
    }

    /// Create a runner that sends summaries to `sink`
    pub fn with_sink(sink: impl SummarySink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    /// Run `test` against a new tally.
    ///
    /// Each call is independent; running the same test twice yields two
    /// separate tallies.
    pub fn run<T: Test + ?Sized>(&mut self, test: &mut T) -> Tally {
        let span = info_span!("test_run", tests = test.count());
        let _enter = span.enter();

        let mut tally = Tally::new();
        test.run(&mut tally);

        self.sink.emit(&tally.summary());
        tally
    }
}
