//! Test suites - ordered composites of tests

use crate::tally::Tally;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Something that can run against a tally.
///
/// Implementations must absorb every fault into the tally; `run` never
/// panics on behalf of the code under test.
pub trait Test {
    fn run(&mut self, tally: &mut Tally);

    /// Number of test cases a run would start
    fn count(&self) -> usize {
        1
    }
}

impl<T: Test + ?Sized> Test for Box<T> {
    fn run(&mut self, tally: &mut Tally) {
        (**self).run(tally);
    }

    fn count(&self) -> usize {
        (**self).count()
    }
}

/// A shared test can be added to several suites, or to one suite twice,
/// and inspected once the run is over.
impl<T: Test + ?Sized> Test for Rc<RefCell<T>> {
    fn run(&mut self, tally: &mut Tally) {
        self.borrow_mut().run(tally);
    }

    fn count(&self) -> usize {
        self.borrow().count()
    }
}

/// Runs its members in insertion order against one tally
#[derive(Default)]
pub struct TestSuite {
    tests: Vec<Box<dyn Test>>,
}

impl TestSuite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a test. No deduplication: adding a shared test twice runs it twice.
    pub fn add<T: Test + 'static>(&mut self, test: T) {
        self.tests.push(Box::new(test));
    }

    /// Number of direct members
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}

impl Test for TestSuite {
    fn run(&mut self, tally: &mut Tally) {
        for test in &mut self.tests {
            test.run(tally);
        }
    }

    fn count(&self) -> usize {
        self.tests.iter().map(|test| test.count()).sum()
    }
}

impl fmt::Debug for TestSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestSuite")
            .field("members", &self.tests.len())
            .field("count", &self.count())
            .finish()
    }
}
