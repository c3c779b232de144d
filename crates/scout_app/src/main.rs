mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use scout_logging::{scout_error, LogDestination};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let destination = match &cli.log_file {
        Some(path) => LogDestination::Both(path.clone()),
        None => LogDestination::Terminal,
    };
    scout_logging::initialize(destination, cli.log_level.into());

    if let Err(err) = run(cli).await {
        scout_error!("command failed: {}", err);
        for cause in err.chain().skip(1) {
            scout_error!("caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Discover(args) => commands::discover::run(args).await,
        Commands::Extract(args) => commands::extract::run(args).await,
    }
}
