//! List command - show discovered tests without running them

use crate::suites::Bundle;
use anyhow::Result;
use xunit_core::Discoverer;

/// Names `xunit run` would execute, in run order
pub fn names(suite: &str, prefix: &str) -> Result<Vec<&'static str>> {
    let bundle = Bundle::from_name(suite)?;
    Ok(bundle.names(&Discoverer::with_prefix(prefix)))
}

/// Print one discovered test name per line
pub fn run(suite: &str, prefix: &str, json: bool) -> Result<()> {
    let names = names(suite, prefix)?;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "suite": suite,
                "tests": names,
            })
        );
    } else {
        for name in names {
            println!("{}", name);
        }
    }

    Ok(())
}
