use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod domain;
mod error;
mod services;

use cli::{Cli, Commands};
use services::config::{default_config_path, load_config};
use services::output::print_err;
use services::telemetry::init_tracing;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match dispatch(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            print_err(cli.json, "CONFIG_ERROR", &format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: &Cli) -> anyhow::Result<u8> {
    let path = match &cli.config {
        Some(p) => p.clone(),
        None => default_config_path()?,
    };
    let config = load_config(&path)?;
    tracing::debug!(config = %path.display(), "configuration loaded");

    match &cli.command {
        Commands::Run {
            start_time,
            end_time,
        } => commands::handle_run(cli.json, config, start_time.clone(), end_time.clone()),
        Commands::Check => commands::handle_check(cli.json, &config),
        Commands::Config { command } => {
            commands::handle_config_commands(cli.json, command, &config)
        }
    }
}
