//! Back-office API client - Main Entry Point
//!
//! Loads the settings, wires the client together and runs one command.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use tracing::error;

use crate::cli::Cli;
use crate::commands::Context;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.log_level.into());

    let settings = backoffice_infrastructure::load_settings(cli.config.as_deref())?;
    let context = Context::new(&settings)?;

    if let Err(e) = context.execute(cli.command).await {
        error!("Command failed: {e}");
        return Err(e);
    }
    Ok(())
}
