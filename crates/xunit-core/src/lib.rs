//! xunit core: the execution and aggregation engine
//!
//! A test is anything that can run against a [`Tally`]. Two kinds exist:
//! - [`TestCase`]: one named behavior of a [`Fixture`], wrapped in the
//!   `set_up` → behavior → `tear_down` lifecycle
//! - [`TestSuite`]: an ordered composite of other tests
//!
//! [`Discoverer`] turns a fixture's behaviors into a suite by name prefix, and
//! [`TestRunner`] runs a test against a fresh tally and emits its summary.
//!
//! # Outcomes
//!
//! Every execution of a test case records exactly one outcome:
//! - pass: the behavior returned `Ok(())`
//! - failure: the behavior returned an [`ExpectationFailure`] (see [`assertions`])
//! - error: any other fault, such as an error, a panic, or a fault in `set_up`/`tear_down`
//!
//! Nothing escapes [`Test::run`]; one broken case never aborts a suite.
//!
//! # Example
//!
//! ```
//! use xunit_core::assertions::assert_equal;
//! use xunit_core::{behaviors, Behavior, Discoverer, Fixture, TestRunner};
//!
//! #[derive(Default)]
//! struct Arithmetic {
//!     base: i32,
//! }
//!
//! impl Arithmetic {
//!     fn test_add(&mut self) -> anyhow::Result<()> {
//!         assert_equal(42, self.base + 2)?;
//!         Ok(())
//!     }
//! }
//!
//! impl Fixture for Arithmetic {
//!     fn behaviors() -> Vec<(&'static str, Behavior<Self>)> {
//!         behaviors![Self => test_add]
//!     }
//!
//!     fn set_up(&mut self) -> anyhow::Result<()> {
//!         self.base = 40;
//!         Ok(())
//!     }
//! }
//!
//! let mut suite = Discoverer::new().build_suite::<Arithmetic>();
//! let tally = TestRunner::new().run(&mut suite);
//! assert_eq!(tally.summary(), "1 run, 0 failed, 0 error");
//! ```

pub mod assertions;
pub mod case;
pub mod discovery;
pub mod error;
pub mod fixture;
pub mod runner;
pub mod selftest;
pub mod suite;
pub mod tally;

pub use case::TestCase;
pub use discovery::{Discoverer, DEFAULT_PREFIX};
pub use error::{ExpectationFailure, LookupError};
pub use fixture::{Behavior, Fixture};
pub use runner::{LogSink, SummarySink, TestRunner};
pub use suite::{Test, TestSuite};
pub use tally::{Diagnostic, Entry, Phase, Tally};
