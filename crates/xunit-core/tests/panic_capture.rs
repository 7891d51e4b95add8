//! Panic capture and the process-wide panic hook
//!
//! Kept to a single test in its own binary: it replaces the panic hook, which
//! would interfere with tests running in parallel threads.

use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use xunit_core::selftest::Arithmetic;
use xunit_core::{Discoverer, TestRunner};

static OUTER_HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

#[test]
fn test_captured_panics_stay_quiet_and_outer_hook_survives() {
    panic::set_hook(Box::new(|_| {
        OUTER_HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
    }));

    let tally = TestRunner::new().run(&mut Discoverer::new().build_suite::<Arithmetic>());
    let calls_during_run = OUTER_HOOK_CALLS.load(Ordering::SeqCst);

    let outside = panic::catch_unwind(|| panic!("outside any test case"));
    let calls_after_outside = OUTER_HOOK_CALLS.load(Ordering::SeqCst);

    // Second run: capture still works after the outer hook was used
    let again = TestRunner::new().run(&mut Discoverer::new().build_suite::<Arithmetic>());
    let calls_after_second_run = OUTER_HOOK_CALLS.load(Ordering::SeqCst);

    // Back to the default hook so assertion messages are printed
    drop(panic::take_hook());

    assert_eq!(tally.summary(), "3 run, 1 failed, 1 error");
    assert_eq!(calls_during_run, 0);
    assert!(outside.is_err());
    assert_eq!(calls_after_outside, 1);
    assert_eq!(calls_after_second_run, 1);

    let error = &tally.errors()[0].diagnostic;
    assert_eq!(error.test, "test_divide_by_zero");
    assert!(error.message.contains("attempt to divide by zero"));
    let location = error.location.as_deref().unwrap();
    assert!(location.contains("selftest.rs"), "{location}");
    assert_eq!(again.errors()[0].diagnostic.location.as_deref(), Some(location));
}
