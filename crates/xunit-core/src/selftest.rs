//! Self-tests: the framework checking itself with its own machinery
//!
//! [`EngineTest`] is an ordinary fixture whose behaviors drive the sample
//! fixtures below through the engine and assert on the resulting tallies.
//! Run it like any other suite:
//!
//! ```
//! use xunit_core::{selftest, Discoverer, TestRunner};
//!
//! let mut suite = selftest::suite(&Discoverer::new());
//! let tally = TestRunner::new().run(&mut suite);
//! assert!(tally.was_successful(), "{}", tally);
//! ```

use crate::assertions::{
    assert_contains, assert_contains_str, assert_equal, assert_false, assert_true,
};
use crate::case::TestCase;
use crate::discovery::Discoverer;
use crate::fixture::{Behavior, Fixture};
use crate::runner::TestRunner;
use crate::suite::{Test, TestSuite};
use crate::tally::{Diagnostic, Phase, Tally};
use crate::behaviors;
use anyhow::{anyhow, bail, Context};
use std::cell::RefCell;
use std::rc::Rc;

/// The self-test suite, discovered with `discoverer`
pub fn suite(discoverer: &Discoverer) -> TestSuite {
    discoverer.build_suite::<EngineTest>()
}

/// Logs each lifecycle step it goes through
#[derive(Debug, Default)]
pub struct WasRun {
    pub log: String,
}

impl WasRun {
    fn test_method(&mut self) -> anyhow::Result<()> {
        self.log.push_str("test_method ");
        Ok(())
    }

    fn test_broken_method(&mut self) -> anyhow::Result<()> {
        self.log.push_str("test_broken_method ");
        bail!("broken method")
    }

    fn test_unmet_expectation(&mut self) -> anyhow::Result<()> {
        self.log.push_str("test_unmet_expectation ");
        assert_equal(1, 2)?;
        Ok(())
    }

    fn test_panicking_method(&mut self) -> anyhow::Result<()> {
        self.log.push_str("test_panicking_method ");
        panic!("panicking method");
    }
}

impl Fixture for WasRun {
    fn behaviors() -> Vec<(&'static str, Behavior<Self>)> {
        behaviors![Self =>
            test_method,
            test_broken_method,
            test_unmet_expectation,
            test_panicking_method,
        ]
    }

    fn set_up(&mut self) -> anyhow::Result<()> {
        self.log = String::from("set_up ");
        Ok(())
    }

    fn tear_down(&mut self) -> anyhow::Result<()> {
        self.log.push_str("tear_down ");
        Ok(())
    }
}

/// `set_up` always fails
#[derive(Debug, Default)]
pub struct SetUpFails {
    pub log: String,
}

impl SetUpFails {
    fn test_never_reached(&mut self) -> anyhow::Result<()> {
        self.log.push_str("test_never_reached ");
        Ok(())
    }
}

impl Fixture for SetUpFails {
    fn behaviors() -> Vec<(&'static str, Behavior<Self>)> {
        behaviors![Self => test_never_reached]
    }

    fn set_up(&mut self) -> anyhow::Result<()> {
        self.log = String::from("set_up ");
        Err(anyhow!("connection refused")).context("opening fixture resources")
    }

    fn tear_down(&mut self) -> anyhow::Result<()> {
        self.log.push_str("tear_down ");
        Ok(())
    }
}

/// `tear_down` always fails
#[derive(Debug, Default)]
pub struct TearDownFails;

impl TearDownFails {
    fn test_passes(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Fixture for TearDownFails {
    fn behaviors() -> Vec<(&'static str, Behavior<Self>)> {
        behaviors![Self => test_passes]
    }

    fn tear_down(&mut self) -> anyhow::Result<()> {
        bail!("could not release lock")
    }
}

/// One passing, one failing, one erroring behavior
#[derive(Debug, Default)]
pub struct Arithmetic;

impl Arithmetic {
    fn test_addition(&mut self) -> anyhow::Result<()> {
        assert_equal(4, 2 + 2)?;
        Ok(())
    }

    fn test_wrong_sum(&mut self) -> anyhow::Result<()> {
        assert_equal(5, 2 + 2)?;
        Ok(())
    }

    fn test_divide_by_zero(&mut self) -> anyhow::Result<()> {
        let divisor = std::hint::black_box(0_i32);
        let quotient = 10 / divisor;
        assert_equal(0, quotient)?;
        Ok(())
    }
}

impl Fixture for Arithmetic {
    fn behaviors() -> Vec<(&'static str, Behavior<Self>)> {
        behaviors![Self => test_wrong_sum, test_divide_by_zero, test_addition]
    }
}

/// Declares behaviors, none of them tests
#[derive(Debug, Default)]
pub struct NoTests;

impl NoTests {
    fn helper(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl Fixture for NoTests {
    fn behaviors() -> Vec<(&'static str, Behavior<Self>)> {
        behaviors![Self => helper]
    }
}

/// Meta-tests for the engine, run by the engine
#[derive(Debug, Default)]
pub struct EngineTest {
    tally: Tally,
}

impl EngineTest {
    fn was_run(&mut self, name: &str) -> anyhow::Result<TestCase<WasRun>> {
        let mut case = TestCase::<WasRun>::from_name(name)?;
        case.run(&mut self.tally);
        Ok(case)
    }

    fn test_template_method(&mut self) -> anyhow::Result<()> {
        let case = self.was_run("test_method")?;
        assert_equal("set_up test_method tear_down ", case.fixture().log.as_str())?;
        Ok(())
    }

    fn test_result(&mut self) -> anyhow::Result<()> {
        self.was_run("test_method")?;
        assert_equal("1 run, 0 failed, 0 error", self.tally.summary())?;
        Ok(())
    }

    fn test_failed_result_formatting(&mut self) -> anyhow::Result<()> {
        self.tally.record_started();
        self.tally.record_failure(
            "test_method",
            Diagnostic::new("test_method", Phase::Test, "expected 1, got 2"),
        );
        assert_equal("1 run, 1 failed, 0 error", self.tally.summary())?;
        Ok(())
    }

    fn test_broken_method_is_error(&mut self) -> anyhow::Result<()> {
        let case = self.was_run("test_broken_method")?;
        assert_equal("1 run, 0 failed, 1 error", self.tally.summary())?;
        assert_equal("broken method", self.tally.errors()[0].diagnostic.message.as_str())?;
        assert_contains_str(&case.fixture().log, "tear_down")?;
        Ok(())
    }

    fn test_unmet_expectation_is_failure(&mut self) -> anyhow::Result<()> {
        let case = self.was_run("test_unmet_expectation")?;
        assert_equal("1 run, 1 failed, 0 error", self.tally.summary())?;

        let entry = &self.tally.failures()[0];
        assert_equal("test_unmet_expectation", entry.test.as_str())?;
        assert_contains_str(&entry.diagnostic.to_string(), "test_unmet_expectation")?;
        assert_true(
            entry.diagnostic.location.is_some(),
            "failure records its location",
        )?;
        assert_contains_str(&case.fixture().log, "tear_down")?;
        Ok(())
    }

    fn test_panic_is_error(&mut self) -> anyhow::Result<()> {
        let case = self.was_run("test_panicking_method")?;
        assert_equal("1 run, 0 failed, 1 error", self.tally.summary())?;
        assert_contains_str(&self.tally.errors()[0].diagnostic.message, "panicking method")?;
        let location = self.tally.errors()[0].diagnostic.location.as_deref().unwrap_or("");
        assert_contains_str(location, "selftest.rs")?;
        assert_equal(
            "set_up test_panicking_method tear_down ",
            case.fixture().log.as_str(),
        )?;
        Ok(())
    }

    fn test_set_up_failure_still_tears_down(&mut self) -> anyhow::Result<()> {
        let mut case = TestCase::<SetUpFails>::from_name("test_never_reached")?;
        case.run(&mut self.tally);

        assert_equal("1 run, 0 failed, 1 error", self.tally.summary())?;
        assert_equal(Phase::SetUp, self.tally.errors()[0].diagnostic.phase)?;
        assert_equal("set_up tear_down ", case.fixture().log.as_str())?;
        assert_contains_str(
            &self.tally.errors()[0].diagnostic.message,
            "connection refused",
        )?;
        Ok(())
    }

    fn test_tear_down_failure_is_error(&mut self) -> anyhow::Result<()> {
        let mut case = TestCase::<TearDownFails>::from_name("test_passes")?;
        case.run(&mut self.tally);

        assert_equal("1 run, 0 failed, 1 error", self.tally.summary())?;
        assert_equal(Phase::TearDown, self.tally.errors()[0].diagnostic.phase)?;
        Ok(())
    }

    fn test_suite(&mut self) -> anyhow::Result<()> {
        let mut suite = TestSuite::new();
        suite.add(TestCase::<WasRun>::from_name("test_method")?);
        suite.add(TestCase::<WasRun>::from_name("test_broken_method")?);
        suite.run(&mut self.tally);

        assert_equal("2 run, 0 failed, 1 error", self.tally.summary())?;
        Ok(())
    }

    fn test_nested_suites(&mut self) -> anyhow::Result<()> {
        let mut small = TestSuite::new();
        small.add(TestCase::<WasRun>::from_name("test_method")?);
        small.add(TestCase::<WasRun>::from_name("test_method")?);

        let large = Discoverer::new().build_suite::<Arithmetic>();
        assert_equal(3, large.len())?;

        let mut outer = TestSuite::new();
        outer.add(small);
        outer.add(large);
        outer.run(&mut self.tally);

        assert_equal(5, self.tally.run_count())?;
        Ok(())
    }

    fn test_shared_case_runs_twice(&mut self) -> anyhow::Result<()> {
        let shared = Rc::new(RefCell::new(TestCase::<WasRun>::from_name("test_method")?));
        let mut suite = TestSuite::new();
        suite.add(Rc::clone(&shared));
        suite.add(Rc::clone(&shared));
        suite.run(&mut self.tally);

        assert_equal(2, self.tally.run_count())?;
        assert_equal("set_up test_method tear_down ", shared.borrow().fixture().log.as_str())?;
        Ok(())
    }

    fn test_discovery_order(&mut self) -> anyhow::Result<()> {
        let names = Discoverer::new().discover_names::<Arithmetic>();
        assert_equal(
            vec!["test_addition", "test_divide_by_zero", "test_wrong_sum"],
            names,
        )?;
        Ok(())
    }

    fn test_discovery_skips_non_tests(&mut self) -> anyhow::Result<()> {
        let names = Discoverer::new().discover_names::<WasRun>();
        assert_contains(&names, &"test_method")?;
        assert_false(names.contains(&"set_up"), "hooks are not behaviors")?;

        let suite = Discoverer::new().build_suite::<NoTests>();
        assert_true(suite.is_empty(), "no behavior matches the prefix")?;
        Ok(())
    }

    fn test_runner_end_to_end(&mut self) -> anyhow::Result<()> {
        let emitted = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&emitted);
        let mut runner = TestRunner::with_sink(move |summary: &str| {
            sink.borrow_mut().push(summary.to_string());
        });

        let tally = runner.run(&mut Discoverer::new().build_suite::<Arithmetic>());
        assert_equal("3 run, 1 failed, 1 error", tally.summary())?;

        let empty = runner.run(&mut Discoverer::new().build_suite::<NoTests>());
        assert_equal("0 run, 0 failed, 0 error", empty.summary())?;

        assert_equal(
            vec![
                "3 run, 1 failed, 1 error".to_string(),
                "0 run, 0 failed, 0 error".to_string(),
            ],
            emitted.borrow().clone(),
        )?;
        Ok(())
    }

    fn test_summary_is_stable(&mut self) -> anyhow::Result<()> {
        self.was_run("test_broken_method")?;
        let first = self.tally.summary();
        assert_equal(first, self.tally.summary())?;
        Ok(())
    }
}

impl Fixture for EngineTest {
    fn behaviors() -> Vec<(&'static str, Behavior<Self>)> {
        behaviors![Self =>
            test_template_method,
            test_result,
            test_failed_result_formatting,
            test_broken_method_is_error,
            test_unmet_expectation_is_failure,
            test_panic_is_error,
            test_set_up_failure_still_tears_down,
            test_tear_down_failure_is_error,
            test_suite,
            test_nested_suites,
            test_shared_case_runs_twice,
            test_discovery_order,
            test_discovery_skips_non_tests,
            test_runner_end_to_end,
            test_summary_is_stable,
        ]
    }

    fn set_up(&mut self) -> anyhow::Result<()> {
        self.tally = Tally::new();
        Ok(())
    }
}
