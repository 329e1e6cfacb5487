use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use tracing_subscriber::EnvFilter;
use verdict_config::{Config, ConfigLoader};

mod commands;
mod demo;
mod suites;
mod testing;

use suites::SuiteKind;

/// Verdict test runner.
///
/// Runs the bundled demonstration suites with the verdict assertion,
/// mocking and runner library and reports the results.
///
/// EXAMPLES:
///     verdict run                      Run every suite
///     verdict run unit mocking         Run selected suite groups
///     verdict run --filter Counter     Run tests whose name contains "Counter"
///     verdict run --json               Machine-readable report
///     verdict list                     Show suites and tests
///
/// ENVIRONMENT VARIABLES:
///     VERDICT_TIMEOUT_MS  Per-test timeout in milliseconds
///     VERDICT_FORMAT      'pretty' or 'json'
///     VERDICT_VERBOSE     Set to '1' for one line per test
///     VERDICT_LOG         Log filter (falls back to RUST_LOG, default 'warn')
///     NO_COLOR            Set to disable colored output
#[derive(Parser)]
#[command(name = "verdict")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run demonstration suites
    ///
    /// Settings from verdict.toml and ~/.verdict/config.toml apply unless
    /// overridden by flags. Exits with status 1 when any test fails.
    ///
    /// EXAMPLES:
    ///     verdict run async --verbose
    ///     verdict run --timeout-ms 200
    #[command(visible_alias = "r")]
    Run {
        /// Suite groups to run (all when omitted)
        #[arg(value_enum)]
        suites: Vec<SuiteKind>,
        /// Only run tests whose "Suite: test" name contains this text
        #[arg(long, short = 'f')]
        filter: Option<String>,
        /// Output results in JSON format
        #[arg(long)]
        json: bool,
        /// One line per test instead of dots
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
        /// Fail tests that run longer than this many milliseconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout_ms: Option<u64>,
    },

    /// List suites and their tests without running them
    #[command(visible_alias = "ls")]
    List {
        /// Suite groups to list (all when omitted)
        #[arg(value_enum)]
        suites: Vec<SuiteKind>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Generate shell completion scripts
    ///
    /// EXAMPLES:
    ///     verdict completions bash > ~/.bash_completions/verdict.bash
    ///     verdict completions zsh > ~/.zfunc/_verdict
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Logs go to stderr so JSON on stdout stays parseable.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("VERDICT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config() -> Result<Config> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    ConfigLoader::new()
        .load_from_directory(&cwd)
        .context("Failed to load configuration")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Run {
            suites,
            filter,
            json,
            verbose,
            no_color,
            timeout_ms,
        } => {
            let config = load_config()?;

            let args = commands::run::RunArgs {
                suites,
                filter,
                json,
                verbose,
                no_color,
                timeout_ms,
            };
            if !commands::run::run(&args, &config)? {
                std::process::exit(1);
            }
        }
        Commands::List {
            suites,
            json,
            no_color,
        } => {
            let color = !no_color && load_config()?.color();
            commands::list::list(&suites, json, color)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_suites() {
        let cli = Cli::parse_from(["verdict", "run", "unit", "async", "--filter", "Math", "--json"]);
        match cli.command {
            Commands::Run {
                suites,
                filter,
                json,
                ..
            } => {
                assert_eq!(suites, vec![SuiteKind::Unit, SuiteKind::Async]);
                assert_eq!(filter.as_deref(), Some("Math"));
                assert!(json);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_list_no_color() {
        let cli = Cli::parse_from(["verdict", "list", "mocking", "--no-color"]);
        match cli.command {
            Commands::List {
                suites, no_color, ..
            } => {
                assert_eq!(suites, vec![SuiteKind::Mocking]);
                assert!(no_color);
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(Cli::try_parse_from(["verdict", "run", "--timeout-ms", "0"]).is_err());
    }

    #[test]
    fn test_unknown_suite_rejected() {
        assert!(Cli::try_parse_from(["verdict", "run", "e2e"]).is_err());
    }

    #[test]
    fn test_completions_zsh() {
        let cli = Cli::parse_from(["verdict", "completions", "zsh"]);
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Zsh),
            _ => panic!("Expected Completions command"),
        }
    }
}
