//! Assertion helpers for test behaviors
//!
//! Each helper returns `Ok(())` when its condition holds and an
//! [`ExpectationFailure`] otherwise, so behaviors use them with `?`:
//!
//! ```
//! use xunit_core::assertions::{assert_contains, assert_equal};
//!
//! fn test_totals() -> anyhow::Result<()> {
//!     assert_equal(4, 2 + 2)?;
//!     assert_contains(&[1, 2, 3], &2)?;
//!     Ok(())
//! }
//! # test_totals().unwrap();
//! ```
//!
//! Failures carry the caller's source location.

use crate::error::ExpectationFailure;
use std::fmt::{Debug, Display};

/// Result of an assertion
pub type Expectation = Result<(), ExpectationFailure>;

/// Assert `actual == expected`
#[track_caller]
pub fn assert_equal<E, A>(expected: E, actual: A) -> Expectation
where
    E: PartialEq<A> + Debug,
    A: Debug,
{
    if expected == actual {
        return Ok(());
    }
    Err(ExpectationFailure::new(format!(
        "expected {:?}, got {:?}",
        expected, actual
    )))
}

/// Assert `actual != unexpected`
#[track_caller]
pub fn assert_not_equal<E, A>(unexpected: E, actual: A) -> Expectation
where
    E: PartialEq<A> + Debug,
    A: Debug,
{
    if unexpected != actual {
        return Ok(());
    }
    Err(ExpectationFailure::new(format!(
        "expected a value other than {:?}",
        unexpected
    )))
}

/// Assert a condition is true
#[track_caller]
pub fn assert_true(condition: bool, message: impl Display) -> Expectation {
    if condition {
        return Ok(());
    }
    Err(ExpectationFailure::new(format!(
        "expected true: {}",
        message
    )))
}

/// Assert a condition is false
#[track_caller]
pub fn assert_false(condition: bool, message: impl Display) -> Expectation {
    if !condition {
        return Ok(());
    }
    Err(ExpectationFailure::new(format!(
        "expected false: {}",
        message
    )))
}

/// Assert `haystack` holds an element equal to `needle`
#[track_caller]
pub fn assert_contains<T: PartialEq + Debug>(haystack: &[T], needle: &T) -> Expectation {
    if haystack.contains(needle) {
        return Ok(());
    }
    Err(ExpectationFailure::new(format!(
        "expected {:?} to contain {:?}",
        haystack, needle
    )))
}

/// Assert `haystack` contains the substring `needle`
#[track_caller]
pub fn assert_contains_str(haystack: &str, needle: &str) -> Expectation {
    if haystack.contains(needle) {
        return Ok(());
    }
    Err(ExpectationFailure::new(format!(
        "expected {:?} to contain {:?}",
        haystack, needle
    )))
}

/// Fail unconditionally
#[track_caller]
pub fn fail(message: impl Into<String>) -> Expectation {
    Err(ExpectationFailure::new(message))
}
