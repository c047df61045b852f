//! roleguard CLI - cross-file consistency checks for role configuration.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{check::CheckOutcome, Cli, Commands};

/// Exit code when the check ran and found violations.
const EXIT_VIOLATIONS: u8 = 1;
/// Exit code when the check could not run.
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "roleguard=debug"
    } else {
        "roleguard=info"
    };

    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.command {
        Commands::Check(args) => commands::check::run(&args, cli.verbose),
        Commands::Rules(args) => commands::rules::run(&args).map(|()| CheckOutcome::Clean),
        Commands::Version => {
            println!("roleguard {}", env!("CARGO_PKG_VERSION"));
            Ok(CheckOutcome::Clean)
        }
    };

    match result {
        Ok(CheckOutcome::Clean) => ExitCode::SUCCESS,
        Ok(CheckOutcome::Violations) => ExitCode::from(EXIT_VIOLATIONS),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
