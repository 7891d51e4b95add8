//! Built-in suites the `xunit` binary knows how to run

use anyhow::{bail, Result};
use xunit_core::selftest::{self, Arithmetic, EngineTest};
use xunit_core::{behaviors, Behavior, Discoverer, Fixture, TestSuite};

/// Names accepted by `xunit run` and `xunit list`
pub const SUITE_NAMES: &[&str] = &["selftest", "lifecycle", "arithmetic"];

/// A registered suite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bundle {
    /// The framework's own self-tests
    SelfTest,
    /// Prints each lifecycle step as it happens
    Lifecycle,
    /// One pass, one failure, one error
    Arithmetic,
}

impl Bundle {
    /// Resolve a suite by its command-line name
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "selftest" => Ok(Bundle::SelfTest),
            "lifecycle" => Ok(Bundle::Lifecycle),
            "arithmetic" => Ok(Bundle::Arithmetic),
            other => bail!(
                "unknown suite '{}' (available: {})",
                other,
                SUITE_NAMES.join(", ")
            ),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Bundle::SelfTest => "selftest",
            Bundle::Lifecycle => "lifecycle",
            Bundle::Arithmetic => "arithmetic",
        }
    }

    /// Build the runnable suite
    pub fn build(&self, discoverer: &Discoverer) -> TestSuite {
        match self {
            Bundle::SelfTest => selftest::suite(discoverer),
            Bundle::Lifecycle => discoverer.build_suite::<Lifecycle>(),
            Bundle::Arithmetic => discoverer.build_suite::<Arithmetic>(),
        }
    }

    /// Behavior names in the order `build` would run them
    pub fn names(&self, discoverer: &Discoverer) -> Vec<&'static str> {
        match self {
            Bundle::SelfTest => discoverer.discover_names::<EngineTest>(),
            Bundle::Lifecycle => discoverer.discover_names::<Lifecycle>(),
            Bundle::Arithmetic => discoverer.discover_names::<Arithmetic>(),
        }
    }
}

/// Demonstration fixture: every hook and behavior prints its own name
#[derive(Debug, Default)]
pub struct Lifecycle;

impl Lifecycle {
    fn test_c(&mut self) -> anyhow::Result<()> {
        println!("test_c");
        Ok(())
    }

    fn test_a(&mut self) -> anyhow::Result<()> {
        println!("test_a");
        Ok(())
    }

    fn test_b(&mut self) -> anyhow::Result<()> {
        println!("test_b");
        Ok(())
    }
}

impl Fixture for Lifecycle {
    fn behaviors() -> Vec<(&'static str, Behavior<Self>)> {
        behaviors![Self => test_c, test_a, test_b]
    }

    fn set_up(&mut self) -> anyhow::Result<()> {
        println!("set_up");
        Ok(())
    }

    fn tear_down(&mut self) -> anyhow::Result<()> {
        println!("tear_down");
        Ok(())
    }
}
