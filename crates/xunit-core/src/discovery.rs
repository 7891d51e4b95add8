//! Test discovery - build suites from fixture behaviors by name prefix

use crate::case::TestCase;
use crate::fixture::Fixture;
use crate::suite::TestSuite;
use tracing::debug;

/// Prefix a behavior name needs to be picked up as a test
pub const DEFAULT_PREFIX: &str = "test";

/// Selects a fixture's behaviors by prefix and orders them by name.
///
/// Sorting makes run order independent of the order `behaviors()` lists them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discoverer {
    prefix: String,
}

impl Default for Discoverer {
    fn default() -> Self {
        Self::new()
    }
}

impl Discoverer {
    /// Discoverer using [`DEFAULT_PREFIX`]
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Discoverer using a custom prefix. An empty prefix matches everything.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Matching behavior names of `F`, sorted
    pub fn discover_names<F: Fixture>(&self) -> Vec<&'static str> {
        select_names(&self.prefix, F::behaviors().into_iter().map(|(name, _)| name))
    }

    /// One test case per matching behavior of `F`, in name order.
    ///
    /// A fixture with no matching behaviors yields an empty suite.
    pub fn build_suite<F: Fixture>(&self) -> TestSuite {
        let behaviors = F::behaviors();
        let names = select_names(&self.prefix, behaviors.iter().map(|(name, _)| *name));

        debug!(
            fixture = F::fixture_name(),
            prefix = %self.prefix,
            count = names.len(),
            "discovered behaviors"
        );

        let mut suite = TestSuite::new();
        for name in names {
            let found = behaviors.iter().find(|(candidate, _)| *candidate == name);
            if let Some((name, behavior)) = found {
                suite.add(TestCase::<F>::new(*name, *behavior));
            }
        }
        suite
    }
}

/// Names starting with `prefix`, sorted lexicographically
pub fn select_names<'a>(prefix: &str, names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut selected: Vec<&str> = names
        .into_iter()
        .filter(|name| name.starts_with(prefix))
        .collect();
    selected.sort();
    selected
}
