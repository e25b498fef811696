//! querygate CLI
//!
//! Command-line interface for the querygate query gateway.

use clap::Parser;
use querygate_cli::{Cli, Commands};
use querygate_core::GatewayError;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), GatewayError> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute command
    match &cli.command {
        Commands::Run(cmd) => {
            cmd.execute(&cli).await?;
        }
        Commands::Query(cmd) => {
            cmd.execute(&cli).await?;
        }
        Commands::Execute(cmd) => {
            cmd.execute(&cli).await?;
        }
        Commands::Init(cmd) => {
            cmd.execute()?;
        }
    }

    Ok(())
}
