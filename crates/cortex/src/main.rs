//! cortex - Command-line client for the Cortex AI assistant platform
//!
//! Account management, assistant configuration and model operations against a
//! running Cortex backend.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("cortex=info".parse()?)
                .add_directive("cortex_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = cortex_core::Config::load()?;

    // Execute command
    match cli.command {
        Commands::Auth(cmd) => commands::auth::execute(cmd, &config).await,
        Commands::Assistant(cmd) => commands::assistant::execute(cmd, &config).await,
        Commands::Model(cmd) => commands::model::execute(cmd, &config).await,
        Commands::Prefs(cmd) => commands::prefs::execute(cmd, &config).await,
        Commands::Keys(cmd) => commands::keys::execute(cmd, &config).await,
        Commands::User(cmd) => commands::user::execute(cmd, &config).await,
        Commands::Version => {
            println!("cortex {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
