//! Console reporting for test runs

pub mod reporter;

pub use reporter::TestReporter;
