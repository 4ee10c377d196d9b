use std::process::ExitCode;

use chrono::Local;
use clap::{CommandFactory, Parser};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

use fare_finder::cli::{Cli, CliError, RunConfig};
use fare_finder::run::run;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match RunConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(CliError::MissingDate) => {
            eprintln!("{}", Cli::command().render_help());
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // RUST_LOG wins over --debug-trips.
    let default_level = if config.debug_trips { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let today = Local::now().date_naive();
    match run(&config, today).await {
        Ok(report) => {
            print!("{}", report.render(config.debug_trips));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
