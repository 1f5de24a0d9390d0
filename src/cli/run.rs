//! CLI entry point and dispatch logic
//!
//! `run()` parses arguments, installs logging, discovers configuration,
//! creates the tokio runtime, dispatches the command and reports errors.

use clap::Parser;
use tracing::debug;

use super::args::{Cli, Commands};
use super::commands;

use crate::{Config, ExitCode, LitDailyError, UserFriendlyError};
use litdaily_utils::logging::init_tracing;
use litdaily_utils::redaction::redact_error_message;

/// Main CLI execution function.
///
/// Handles ALL output including errors and returns the exit code to use on
/// failure; main.rs only maps it to the process exit status.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("warning: failed to initialize logging: {e}");
    }

    let config = match Config::discover(&cli.to_cli_args()) {
        Ok(config) => config,
        Err(err) => {
            let err = LitDailyError::from(err);
            eprintln!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };
    debug!(config_file = ?config.config_file, store = %config.store.path.display(), "Configuration loaded");

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let operation = cli.operation();
    let result = rt.block_on(async {
        match cli.command {
            Commands::Today { json } => commands::execute_today_command(&config, json).await,
            Commands::Generate => commands::execute_generate_command(&config).await,
            Commands::Preview { json } => commands::execute_preview_command(&config, json).await,
            Commands::Show { date, json } => {
                commands::execute_show_command(&config, date, json).await
            }
            Commands::Config => commands::execute_config_command(&config),
        }
    });

    match result {
        Ok(code) if code == ExitCode::SUCCESS => Ok(()),
        Ok(code) => Err(code),
        Err(error) => {
            if let Some(err) = error.downcast_ref::<LitDailyError>() {
                debug!(operation, category = ?err.category(), "Command failed");
                eprintln!("{}", err.display_for_user());
                Err(err.to_exit_code())
            } else {
                eprintln!(
                    "✗ Unexpected error during {operation}: {}",
                    redact_error_message(&format!("{error:#}"))
                );
                eprintln!("\n  Run with --verbose for more detailed output");
                Err(ExitCode::INTERNAL)
            }
        }
    }
}
