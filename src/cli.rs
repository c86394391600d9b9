use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "reqlog-job",
    version,
    about = "Runs the request-log reporter and mails its report and diagnostics"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Config file (default: $HOME/.config/reqlog-job/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the reporter and send both mails.
    Run {
        #[arg(long, help = "Report window start (YYYY-MM-DD)")]
        start_time: Option<String>,
        #[arg(long, help = "Report window end (YYYY-MM-DD)")]
        end_time: Option<String>,
    },
    /// Check configuration, environment and collaborators without sending mail.
    Check,
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the resolved configuration (database password redacted).
    Show,
}
