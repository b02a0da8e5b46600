//! CLI entry point
//!
//! `run()` parses arguments, resolves configuration, runs one repair transaction and prints
//! the outcome. It handles ALL output including errors; main.rs only maps the returned
//! `ExitCode` to the process status.

use clap::Parser;

use super::args::Cli;
use super::report::{render_stderr, render_stdout};

use crate::{CliArgs, Config, ExitCode, NbfixError};
use nbfix_engine::{RepairMode, RepairOptions, RepairTransaction};
use nbfix_utils::canonicalization::emit_jcs;
use nbfix_utils::logging::init_tracing;

/// Main CLI execution function.
///
/// Returns `Ok(())` for exit status 0 and `Err(code)` otherwise. Usage errors never get
/// here: clap prints them and exits with status 2.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();
    execute(&cli)
}

/// Run an already-parsed command line.
pub fn execute(cli: &Cli) -> Result<(), ExitCode> {
    let cli_args = CliArgs {
        config_path: cli.config.clone(),
        verbose: cli.verbose.then_some(true),
        indent: cli.indent,
        backup_label: cli.backup_label.clone(),
    };

    let config = match Config::discover(&cli_args) {
        Ok(config) => config,
        Err(err) => {
            let err = NbfixError::from(err);
            eprint!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };

    // A subscriber may already be installed when embedded; logging is best effort
    let _ = init_tracing(config.verbose);
    tracing::debug!(
        verbose = config.verbose,
        indent = ?config.indent,
        backup_label = %config.backup_label,
        "Effective configuration"
    );

    let options = RepairOptions {
        mode: if cli.check {
            RepairMode::Check
        } else {
            RepairMode::Apply
        },
        backup_label: config.backup_label.clone(),
        indent: config.indent,
    };

    let outcome = RepairTransaction::new(options).process(&cli.notebook);

    if cli.json {
        match emit_jcs(&outcome.summary(&cli.notebook)) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("✗ Failed to emit JSON outcome: {e:#}");
                return Err(ExitCode::FAILURE);
            }
        }
    } else {
        print!("{}", render_stdout(&cli.notebook, &outcome));
        eprint!("{}", render_stderr(&cli.notebook, &outcome));
    }

    let code = outcome.exit_code();
    if code.is_success() { Ok(()) } else { Err(code) }
}
