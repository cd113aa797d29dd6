use std::path::PathBuf;

use crate::commands::{run_check, run_classes, CheckArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use exalt_check::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Exalted Lost Halls gear check",
    about = "Serve and run Exalted Lost Halls gear requirement checks",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Check a single loadout against the rulebook
    Check(CheckArgs),
    /// Print the exalted point requirement of every class
    Classes,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the directory holding the rulebook text files
    #[arg(long)]
    pub(crate) rules_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args).await,
        Command::Classes => {
            run_classes();
            Ok(())
        }
    }
}
