//! Test case - one behavior run through the fixture lifecycle
//!
//! `run` always follows the same path:
//!
//! ```text
//! started -> set_up -> behavior -> tear_down -> record outcome
//! ```
//!
//! A fault in `set_up` skips the behavior but never skips `tear_down`.
//! Panics are caught at each step, so every exit path reaches `tear_down`.
//!
//! While a step runs, its panics are captured instead of printed: the first
//! guarded step installs a process-wide hook that records the panic location
//! (and a backtrace, when enabled) for the current thread. Panics on threads
//! outside a guarded step still go to the hook that was installed before.

use crate::error::{ExpectationFailure, LookupError};
use crate::fixture::{Behavior, Fixture};
use crate::suite::Test;
use crate::tally::{Diagnostic, Phase, Tally};
use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use tracing::{debug, debug_span, warn};

/// A single behavior of fixture `F`, with its own fixture instance
pub struct TestCase<F: Fixture> {
    name: &'static str,
    behavior: Behavior<F>,
    fixture: F,
}

impl<F: Fixture> TestCase<F> {
    /// Bind `behavior` under `name` to a fresh fixture instance
    pub fn new(name: &'static str, behavior: Behavior<F>) -> Self {
        Self {
            name,
            behavior,
            fixture: F::default(),
        }
    }

    /// Resolve a behavior of `F` by name, once, at construction
    pub fn from_name(name: &str) -> Result<Self, LookupError> {
        F::behaviors()
            .into_iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(name, behavior)| Self::new(name, behavior))
            .ok_or_else(|| LookupError::UnknownBehavior {
                fixture: F::fixture_name(),
                name: name.to_string(),
            })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The fixture instance, as left by the last run
    pub fn fixture(&self) -> &F {
        &self.fixture
    }

    pub fn fixture_mut(&mut self) -> &mut F {
        &mut self.fixture
    }
}

impl<F: Fixture> fmt::Debug for TestCase<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("fixture", &F::fixture_name())
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<F: Fixture> Test for TestCase<F> {
    fn run(&mut self, tally: &mut Tally) {
        let span = debug_span!("test_case", name = self.name);
        let _enter = span.enter();

        tally.record_started();

        let outcome = match guarded(|| self.fixture.set_up()) {
            Ok(()) => {
                let behavior = self.behavior;
                guarded(|| behavior(&mut self.fixture)).map_err(|fault| (Phase::Test, fault))
            }
            Err(fault) => Err((Phase::SetUp, fault)),
        };

        let outcome = match (outcome, guarded(|| self.fixture.tear_down())) {
            (outcome, Ok(())) => outcome,
            (Ok(()), Err(fault)) => Err((Phase::TearDown, fault)),
            (Err(first), Err(fault)) => {
                // One outcome per run: the earlier fault wins.
                warn!(test = self.name, fault = %fault, "tear_down failed after an earlier fault");
                Err(first)
            }
        };

        match outcome {
            Ok(()) => debug!("passed"),
            Err((phase, fault)) => fault.record(self.name, phase, tally),
        }
    }
}

/// Anything that stopped a lifecycle step from completing
#[derive(Debug)]
enum Fault {
    Expectation(ExpectationFailure),
    Unexpected(anyhow::Error),
    Panic {
        message: String,
        site: Option<PanicSite>,
    },
}

/// Where a captured panic was raised
#[derive(Debug, Clone)]
struct PanicSite {
    location: Option<String>,
    backtrace: Option<String>,
}

impl Fault {
    fn from_error(err: anyhow::Error) -> Self {
        match err.downcast::<ExpectationFailure>() {
            Ok(failure) => Fault::Expectation(failure),
            Err(err) => Fault::Unexpected(err),
        }
    }

    fn from_panic(payload: Box<dyn Any + Send>, site: Option<PanicSite>) -> Self {
        let payload = match payload.downcast::<ExpectationFailure>() {
            Ok(failure) => return Fault::Expectation(*failure),
            Err(payload) => payload,
        };

        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "test panicked".to_string()
        };
        Fault::Panic { message, site }
    }

    /// Only a failed expectation in the behavior itself counts as a failure.
    fn record(self, test: &str, phase: Phase, tally: &mut Tally) {
        match self {
            Fault::Expectation(failure) if phase == Phase::Test => {
                debug!(%failure, "failed");
                let diagnostic = Diagnostic::new(test, phase, failure.message())
                    .with_location(failure.location().to_string());
                tally.record_failure(test, diagnostic);
            }
            Fault::Expectation(failure) => {
                debug!(%phase, %failure, "errored");
                let diagnostic = Diagnostic::new(test, phase, failure.message())
                    .with_location(failure.location().to_string());
                tally.record_error(test, diagnostic);
            }
            Fault::Unexpected(err) => {
                debug!(%phase, error = %err, "errored");
                let mut diagnostic = Diagnostic::new(test, phase, format!("{:#}", err));
                let backtrace = err.backtrace();
                if backtrace.status() == BacktraceStatus::Captured {
                    diagnostic = diagnostic.with_backtrace(backtrace.to_string());
                }
                tally.record_error(test, diagnostic);
            }
            Fault::Panic { message, site } => {
                debug!(%phase, %message, "panicked");
                let mut diagnostic = Diagnostic::new(test, phase, format!("panicked: {}", message));
                if let Some(site) = site {
                    if let Some(location) = site.location {
                        diagnostic = diagnostic.with_location(location);
                    }
                    if let Some(backtrace) = site.backtrace {
                        diagnostic = diagnostic.with_backtrace(backtrace);
                    }
                }
                tally.record_error(test, diagnostic);
            }
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Expectation(failure) => write!(f, "{}", failure),
            Fault::Unexpected(err) => write!(f, "{:#}", err),
            Fault::Panic { message, .. } => write!(f, "panicked: {}", message),
        }
    }
}

thread_local! {
    /// Number of guarded steps currently running on this thread
    static GUARD_DEPTH: Cell<usize> = const { Cell::new(0) };
    /// Site of the last panic raised inside a guarded step
    static LAST_PANIC: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

static CAPTURE_HOOK: Once = Once::new();

/// Wrap the current panic hook so guarded panics are recorded, not printed
fn install_capture_hook() {
    CAPTURE_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let guarded = GUARD_DEPTH.try_with(Cell::get).unwrap_or(0) > 0;
            if !guarded {
                previous(info);
                return;
            }

            let backtrace = Backtrace::capture();
            let site = PanicSite {
                location: info.location().map(|location| location.to_string()),
                backtrace: (backtrace.status() == BacktraceStatus::Captured)
                    .then(|| backtrace.to_string()),
            };
            let _ = LAST_PANIC.try_with(|last| *last.borrow_mut() = Some(site));
        }));
    });
}

/// Run one lifecycle step, turning errors and panics into a [`Fault`]
fn guarded(step: impl FnOnce() -> anyhow::Result<()>) -> Result<(), Fault> {
    install_capture_hook();
    LAST_PANIC.with(|last| last.borrow_mut().take());
    GUARD_DEPTH.with(|depth| depth.set(depth.get() + 1));

    let result = panic::catch_unwind(AssertUnwindSafe(step));

    GUARD_DEPTH.with(|depth| depth.set(depth.get() - 1));
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(Fault::from_error(err)),
        Err(payload) => {
            let site = LAST_PANIC.with(|last| last.borrow_mut().take());
            Err(Fault::from_panic(payload, site))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertions::assert_equal;
    use crate::behaviors;
    use anyhow::{anyhow, Context};
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default)]
    struct Recorder {
        log: Vec<&'static str>,
        fail_set_up: bool,
        fail_tear_down: bool,
        panic_line: u32,
    }

    impl Recorder {
        fn test_pass(&mut self) -> anyhow::Result<()> {
            self.log.push("test_pass");
            Ok(())
        }

        fn test_expectation(&mut self) -> anyhow::Result<()> {
            self.log.push("test_expectation");
            assert_equal(1, 2)?;
            Ok(())
        }

        fn test_error(&mut self) -> anyhow::Result<()> {
            self.log.push("test_error");
            let divisor = 0_i32;
            let quotient = 10_i32.checked_div(divisor).context("division by zero")?;
            self.log.push(if quotient > 0 { "positive" } else { "other" });
            Ok(())
        }

        fn test_panic(&mut self) -> anyhow::Result<()> {
            self.log.push("test_panic");
            self.panic_line = line!() + 1;
            panic!("exploded");
        }

        fn test_panic_any_expectation(&mut self) -> anyhow::Result<()> {
            std::panic::panic_any(ExpectationFailure::new("raised by panic"));
        }

        fn test_wrapped_expectation(&mut self) -> anyhow::Result<()> {
            assert_equal("a", "b").context("comparing letters")?;
            Ok(())
        }
    }

    impl Fixture for Recorder {
        fn behaviors() -> Vec<(&'static str, Behavior<Self>)> {
            behaviors![Self =>
                test_pass,
                test_expectation,
                test_error,
                test_panic,
                test_panic_any_expectation,
                test_wrapped_expectation,
            ]
        }

        fn set_up(&mut self) -> anyhow::Result<()> {
            self.log.push("set_up");
            if self.fail_set_up {
                return Err(anyhow!("set_up refused"));
            }
            Ok(())
        }

        fn tear_down(&mut self) -> anyhow::Result<()> {
            self.log.push("tear_down");
            if self.fail_tear_down {
                return Err(anyhow!("tear_down refused"));
            }
            Ok(())
        }
    }

    fn case(name: &str) -> TestCase<Recorder> {
        TestCase::from_name(name).unwrap()
    }

    fn run(case: &mut TestCase<Recorder>) -> Tally {
        let mut tally = Tally::new();
        case.run(&mut tally);
        tally
    }

    #[test]
    fn test_pass_records_only_started() {
        let mut case = case("test_pass");
        let tally = run(&mut case);

        assert_eq!(tally.run_count(), 1);
        assert_eq!(tally.failure_count(), 0);
        assert_eq!(tally.error_count(), 0);
        assert_eq!(case.fixture().log, vec!["set_up", "test_pass", "tear_down"]);
    }

    #[test]
    fn test_expectation_is_failure() {
        let mut case = case("test_expectation");
        let tally = run(&mut case);

        assert_eq!(tally.summary(), "1 run, 1 failed, 0 error");
        let entry = &tally.failures()[0];
        assert_eq!(entry.test, "test_expectation");
        assert_eq!(entry.diagnostic.phase, Phase::Test);
        assert!(entry.diagnostic.to_string().contains("test_expectation"));
        assert!(entry.diagnostic.location.as_deref().unwrap().contains("case.rs"));
        assert_eq!(
            case.fixture().log,
            vec!["set_up", "test_expectation", "tear_down"]
        );
    }

    #[test]
    fn test_other_error_is_error() {
        let mut case = case("test_error");
        let tally = run(&mut case);

        assert_eq!(tally.summary(), "1 run, 0 failed, 1 error");
        assert_eq!(tally.errors()[0].diagnostic.message, "division by zero");
        assert_eq!(case.fixture().log.last(), Some(&"tear_down"));
    }

    #[test]
    fn test_panic_is_error_and_tears_down() {
        let mut case = case("test_panic");
        let tally = run(&mut case);

        assert_eq!(tally.summary(), "1 run, 0 failed, 1 error");
        assert_eq!(tally.errors()[0].diagnostic.message, "panicked: exploded");
        assert_eq!(case.fixture().log, vec!["set_up", "test_panic", "tear_down"]);
    }

    #[test]
    fn test_panic_records_its_location() {
        let mut case = case("test_panic");
        let tally = run(&mut case);

        let location = tally.errors()[0].diagnostic.location.clone().unwrap();
        let expected = format!("{}:{}:", file!(), case.fixture().panic_line);
        assert!(location.starts_with(&expected), "{location} vs {expected}");
    }

    #[test]
    fn test_nested_panic_keeps_outer_location() {
        #[derive(Default)]
        struct Outer {
            inner_location: Option<String>,
        }

        impl Outer {
            fn test_runs_inner(&mut self) -> anyhow::Result<()> {
                let mut inner = Tally::new();
                TestCase::<Recorder>::from_name("test_panic")?.run(&mut inner);
                self.inner_location = inner.errors()[0].diagnostic.location.clone();
                panic!("outer");
            }
        }

        impl Fixture for Outer {
            fn behaviors() -> Vec<(&'static str, Behavior<Self>)> {
                behaviors![Self => test_runs_inner]
            }
        }

        let mut case = TestCase::<Outer>::from_name("test_runs_inner").unwrap();
        let mut tally = Tally::new();
        case.run(&mut tally);

        let inner = case.fixture().inner_location.clone().unwrap();
        let outer = tally.errors()[0].diagnostic.location.clone().unwrap();
        assert_eq!(tally.errors()[0].diagnostic.message, "panicked: outer");
        assert!(inner.contains("case.rs"));
        assert!(outer.contains("case.rs"));
        assert_ne!(inner, outer);
    }

    #[test]
    fn test_expectation_panic_payload_is_failure() {
        let tally = run(&mut case("test_panic_any_expectation"));
        assert_eq!(tally.summary(), "1 run, 1 failed, 0 error");
        assert_eq!(tally.failures()[0].diagnostic.message, "raised by panic");
    }

    #[test]
    fn test_expectation_behind_context_is_failure() {
        let tally = run(&mut case("test_wrapped_expectation"));
        assert_eq!(tally.summary(), "1 run, 1 failed, 0 error");
    }

    #[test]
    fn test_set_up_fault_skips_behavior_but_tears_down() {
        let mut case = case("test_pass");
        case.fixture_mut().fail_set_up = true;
        let tally = run(&mut case);

        assert_eq!(tally.summary(), "1 run, 0 failed, 1 error");
        assert_eq!(tally.errors()[0].diagnostic.phase, Phase::SetUp);
        assert_eq!(case.fixture().log, vec!["set_up", "tear_down"]);
    }

    #[test]
    fn test_tear_down_fault_after_pass_is_error() {
        let mut case = case("test_pass");
        case.fixture_mut().fail_tear_down = true;
        let tally = run(&mut case);

        assert_eq!(tally.summary(), "1 run, 0 failed, 1 error");
        assert_eq!(tally.errors()[0].diagnostic.phase, Phase::TearDown);
    }

    #[test]
    fn test_tear_down_fault_after_failure_keeps_one_outcome() {
        let mut case = case("test_expectation");
        case.fixture_mut().fail_tear_down = true;
        let tally = run(&mut case);

        assert_eq!(tally.summary(), "1 run, 1 failed, 0 error");
    }

    #[test]
    fn test_rerun_repeats_lifecycle() {
        let mut case = case("test_pass");
        let mut tally = Tally::new();
        case.run(&mut tally);
        case.run(&mut tally);

        assert_eq!(tally.run_count(), 2);
        assert_eq!(
            case.fixture().log,
            vec!["set_up", "test_pass", "tear_down", "set_up", "test_pass", "tear_down"]
        );
    }

    #[test]
    fn test_from_name_unknown_behavior() {
        let err = TestCase::<Recorder>::from_name("test_missing").unwrap_err();
        assert!(matches!(
            err,
            LookupError::UnknownBehavior { ref name, .. } if name == "test_missing"
        ));
    }

    #[test]
    fn test_debug_shows_name() {
        let rendered = format!("{:?}", case("test_pass"));
        assert!(rendered.contains("test_pass"));
    }
}
