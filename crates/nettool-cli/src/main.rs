use clap::Parser;
use colored::Colorize;
use nettool_bot::logging;
use nettool_cli::{Cli, CliError};
use std::process::exit;
use tracing::debug;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => fail(err),
    };
    if let Err(err) = logging::init(&config.logging) {
        eprintln!("{}", format!("Failed to initialize logging: {err}").yellow());
    }
    debug!("Configuration loaded successfully");

    match cli.run(&config).await {
        Ok(report) => exit(report.exit_code()),
        Err(err) => fail(err),
    }
}

fn fail(err: CliError) -> ! {
    eprintln!("{}", err.to_string().red());
    exit(err.exit_code());
}
