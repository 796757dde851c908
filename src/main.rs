//! `provision` command-line entry point.

use anyhow::Result;
use clap::Parser;

use provision::cli::{self, Command};
use provision::{commands, logging};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    match args.command {
        Some(Command::Completions { shell }) => {
            commands::completions::run(shell);
            Ok(())
        }
        Some(Command::Version) => {
            commands::version::run();
            Ok(())
        }
        Some(Command::Install) | None => {
            let level = args.console_level();
            let log_file = args.log_file.unwrap_or_else(logging::default_log_path);
            if let Some(e) = logging::init_subscriber(level, &log_file) {
                tracing::warn!("log file unavailable, logging to console only: {e:#}");
            }
            commands::install::run(&args.global, &args.skip, log_file)
        }
    }
}
