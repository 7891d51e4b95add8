use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};
use tracing::warn;

mod commands;
mod config;
mod suites;
mod testing;

/// xunit: a minimal xUnit-style test framework.
///
/// Runs the built-in suites through the framework's own engine and reports
/// every failure and error followed by the run summary.
///
/// EXAMPLES:
///     xunit run                    Run the self-test suite
///     xunit run lifecycle          Watch set_up/tear_down wrap each test
///     xunit run arithmetic --json  Report a failing run as JSON
///     xunit list selftest          Show tests in run order
///
/// ENVIRONMENT VARIABLES:
///     XUNIT_JSON     Set to '1' for JSON output by default
///     XUNIT_PREFIX   Override the discovery prefix
///     XUNIT_FORMAT   'text' or 'json'
///     XUNIT_VERBOSE  Set to '1' for detailed output
///     NO_COLOR       Set to disable colored output
///     RUST_LOG       Log filter (default: warn)
#[derive(Parser)]
#[command(name = "xunit")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a built-in suite
    ///
    /// Discovers the suite's tests by prefix, runs them in lexicographic
    /// order, and exits with code 1 if any test failed or errored.
    ///
    /// EXAMPLES:
    ///     xunit run                         Run the self-test suite
    ///     xunit run lifecycle -v            Show the planned tests
    ///     xunit run arithmetic --no-color   Plain output
    #[command(visible_alias = "r")]
    Run {
        /// Suite to run (selftest, lifecycle, arithmetic)
        #[arg(default_value = "selftest")]
        suite: String,
        /// Only run behaviors whose name starts with this prefix
        #[arg(long)]
        prefix: Option<String>,
        /// Output results in JSON format
        #[arg(long, env = "XUNIT_JSON", value_parser = FalseyValueParser::new())]
        json: bool,
        /// Show backtraces and the suite plan; enables debug logging
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Disable colored output
        #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
        no_color: bool,
    },

    /// List the tests a suite would run
    ///
    /// EXAMPLES:
    ///     xunit list                   List self-tests
    ///     xunit list lifecycle --json  List as JSON
    #[command(visible_alias = "ls")]
    List {
        /// Suite to inspect (selftest, lifecycle, arithmetic)
        #[arg(default_value = "selftest")]
        suite: String,
        /// Only list behaviors whose name starts with this prefix
        #[arg(long)]
        prefix: Option<String>,
        /// Output in JSON format
        #[arg(long, env = "XUNIT_JSON", value_parser = FalseyValueParser::new())]
        json: bool,
    },
}

impl Commands {
    fn flags(&self) -> config::Flags {
        match self {
            Commands::Run {
                prefix,
                json,
                verbose,
                no_color,
                ..
            } => config::Flags {
                prefix: prefix.clone(),
                verbose: *verbose,
                json: *json,
                no_color: *no_color,
            },
            Commands::List { prefix, json, .. } => config::Flags {
                prefix: prefix.clone(),
                json: *json,
                ..Default::default()
            },
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Project config (xunit.toml) is optional; an unreadable one only warns
    let loaded = xunit_config::ConfigLoader::new().load_from_directory(&std::env::current_dir()?);
    let settings = config::Settings::resolve(cli.command.flags(), loaded.as_ref().ok())?;

    init_logging(settings.verbose);
    if let Err(err) = &loaded {
        warn!(error = %err, "ignoring configuration");
    }

    match cli.command {
        Commands::Run { suite, .. } => {
            commands::run::run(commands::run::RunArgs { suite, settings })?;
        }
        Commands::List { suite, .. } => {
            commands::list::run(&suite, &settings.prefix, settings.json)?;
        }
    }

    Ok(())
}
