//! Test reporter - display run results

use colored::*;
use std::fmt::Write;
use xunit_core::{Entry, Phase, Tally};

/// Test reporter with output configuration
pub struct TestReporter {
    /// Show locations, backtraces, and the full suite plan
    verbose: bool,
}

impl Default for TestReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl TestReporter {
    /// Create a new test reporter
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print the banner shown before a run
    pub fn print_plan(&self, suite: &str, names: &[&str]) {
        println!(
            "Running {} test{} from {}",
            names.len().to_string().bold(),
            if names.len() == 1 { "" } else { "s" },
            suite.bold()
        );
        if self.verbose {
            for name in names {
                println!("  {}", name.dimmed());
            }
        }
        println!();
    }

    /// Report test results
    pub fn report(&self, tally: &Tally) {
        print!("{}", self.render(tally));
    }

    /// Render failures, errors, and the summary line
    pub fn render(&self, tally: &Tally) -> String {
        let mut out = String::new();

        self.render_entries(&mut out, "Failures:", tally.failures(), false);
        self.render_entries(&mut out, "Errors:", tally.errors(), true);

        let _ = writeln!(out, "{}", "─".repeat(50));

        let status = if tally.was_successful() {
            "PASSED".green().bold()
        } else {
            "FAILED".red().bold()
        };
        let summary = tally.summary();
        let summary = if tally.was_successful() {
            summary.green()
        } else {
            summary.red()
        };
        let _ = writeln!(out, "Test result: {} | {}", status, summary);

        out
    }

    fn render_entries(&self, out: &mut String, heading: &str, entries: &[Entry], is_error: bool) {
        if entries.is_empty() {
            return;
        }

        let heading = if is_error {
            heading.yellow().bold()
        } else {
            heading.red().bold()
        };
        let _ = writeln!(out, "{}", heading);
        let _ = writeln!(out);

        for entry in entries {
            let bullet = if is_error { "●".yellow() } else { "●".red() };
            let diagnostic = &entry.diagnostic;

            let _ = write!(out, "  {} {}", bullet, entry.test.bold());
            if diagnostic.phase != Phase::Test {
                let _ = write!(out, " [{}]", diagnostic.phase);
            }
            let _ = writeln!(out);

            for line in diagnostic.message.lines() {
                let _ = writeln!(out, "      {}", line.dimmed());
            }
            if let Some(location) = &diagnostic.location {
                let _ = writeln!(out, "      at {}", location);
            }
            if self.verbose {
                if let Some(backtrace) = &diagnostic.backtrace {
                    for line in backtrace.lines() {
                        let _ = writeln!(out, "        {}", line.dimmed());
                    }
                }
            }
            let _ = writeln!(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xunit_core::Diagnostic;

    fn plain(reporter: &TestReporter, tally: &Tally) -> String {
        colored::control::set_override(false);
        reporter.render(tally)
    }

    fn mixed_tally() -> Tally {
        let mut tally = Tally::new();
        tally.record_started();
        tally.record_started();
        tally.record_failure(
            "test_sum",
            Diagnostic::new("test_sum", Phase::Test, "expected 4, got 5")
                .with_location("src/math.rs:10:5"),
        );
        tally.record_started();
        tally.record_error(
            "test_db",
            Diagnostic::new("test_db", Phase::SetUp, "connection refused")
                .with_backtrace("frame 0\nframe 1"),
        );
        tally
    }

    #[test]
    fn test_render_successful_run() {
        let mut tally = Tally::new();
        tally.record_started();

        let out = plain(&TestReporter::new(false), &tally);
        assert!(out.contains("Test result: PASSED | 1 run, 0 failed, 0 error"));
        assert!(!out.contains("Failures:"));
        assert!(!out.contains("Errors:"));
    }

    #[test]
    fn test_render_failures_and_errors() {
        let out = plain(&TestReporter::new(false), &mixed_tally());

        assert!(out.contains("Failures:"));
        assert!(out.contains("● test_sum"));
        assert!(out.contains("expected 4, got 5"));
        assert!(out.contains("at src/math.rs:10:5"));
        assert!(out.contains("Errors:"));
        assert!(out.contains("● test_db [set_up]"));
        assert!(out.contains("Test result: FAILED | 3 run, 1 failed, 1 error"));
    }

    #[test]
    fn test_backtrace_only_when_verbose() {
        let quiet = plain(&TestReporter::new(false), &mixed_tally());
        let verbose = plain(&TestReporter::new(true), &mixed_tally());

        assert!(!quiet.contains("frame 1"));
        assert!(verbose.contains("frame 1"));
    }

    #[test]
    fn test_failures_listed_before_errors() {
        let out = plain(&TestReporter::default(), &mixed_tally());
        let failures = out.find("Failures:").unwrap();
        let errors = out.find("Errors:").unwrap();
        assert!(failures < errors);
    }
}
