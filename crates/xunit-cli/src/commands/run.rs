//! Run command - execute a built-in suite

use crate::config::Settings;
use crate::suites::Bundle;
use crate::testing::TestReporter;
use anyhow::Result;
use tracing::debug;
use xunit_core::{Discoverer, Tally, TestRunner};

/// Arguments for the run command
pub struct RunArgs {
    /// Suite to run
    pub suite: String,
    /// Effective settings
    pub settings: Settings,
}

/// Run the suite, print results, and return the tally
pub fn execute(args: &RunArgs) -> Result<Tally> {
    let bundle = Bundle::from_name(&args.suite)?;
    let discoverer = Discoverer::with_prefix(args.settings.prefix.as_str());
    let reporter = TestReporter::new(args.settings.verbose);

    debug!(suite = bundle.name(), prefix = discoverer.prefix(), "running suite");

    if !args.settings.json {
        reporter.print_plan(bundle.name(), &bundle.names(&discoverer));
    }

    let mut suite = bundle.build(&discoverer);
    let tally = TestRunner::new().run(&mut suite);

    if args.settings.json {
        println!("{}", json_report(bundle.name(), &tally)?);
    } else {
        reporter.report(&tally);
    }

    Ok(tally)
}

/// Run the command, exiting with code 1 when the run was not successful
pub fn run(args: RunArgs) -> Result<()> {
    if !args.settings.color {
        colored::control::set_override(false);
    }

    let tally = execute(&args)?;

    if !tally.was_successful() {
        std::process::exit(1);
    }

    Ok(())
}

fn json_report(suite: &str, tally: &Tally) -> Result<String> {
    let report = serde_json::json!({
        "suite": suite,
        "summary": tally.summary(),
        "successful": tally.was_successful(),
        "run": tally.run_count(),
        "failures": tally.failures(),
        "errors": tally.errors(),
    });
    Ok(serde_json::to_string_pretty(&report)?)
}
