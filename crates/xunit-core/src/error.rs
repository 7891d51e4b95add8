//! Error types for the engine
//!
//! [`ExpectationFailure`] is the one error kind a test case classifies as a
//! *failure*; every other error raised by a behavior counts as an *error*.

use std::panic::Location;
use thiserror::Error;

/// A checked condition that did not hold.
///
/// Raised by the helpers in [`crate::assertions`]. Carries the source
/// location of the assertion call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExpectationFailure {
    message: String,
    location: &'static Location<'static>,
}

impl ExpectationFailure {
    /// Create a failure located at the caller.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: Location::caller(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where the failing assertion was called from
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

/// Errors raised while resolving behaviors by name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("fixture '{fixture}' has no behavior named '{name}'")]
    UnknownBehavior { fixture: &'static str, name: String },
}
