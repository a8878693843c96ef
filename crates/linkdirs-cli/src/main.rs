mod cli;
mod options;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use linkdirs_core::config::ConfigValidator;
use linkdirs_core::link_directories;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(messages) => {
            for message in &messages {
                println!("{message}");
            }
            if messages.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<Vec<String>> {
    // Set up Ctrl+C handler for graceful interruption
    ctrlc::set_handler(|| {
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(130); // Standard exit code for SIGINT
    })
    .context("Failed to set Ctrl+C handler")?;

    let options = options::build_options(cli).context("Failed to load options")?;
    let (sources, dest) = cli.split_directories();

    if cli.debug {
        eprintln!("{options:#?}");
        eprintln!("sources: {sources:#?}");
        eprintln!("destination: {}", dest.display());
    }

    let problems = ConfigValidator::validate_options(&options);
    if !problems.is_empty() {
        return Ok(problems);
    }

    link_directories(sources, dest, &options)
}

/// Log to stderr; stdout carries dry-run commands and messages
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
