use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod accounts;
mod cli;
mod config;

#[cfg(test)]
mod test_utils;

use cli::Cli;
use config::Settings;

/// Main entry point for the wholesale database tools.
#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::load()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Wholesale tools starting up");
    debug!(?settings, "Loaded settings");

    let cli = Cli::parse();
    cli.run(settings).await?;

    Ok(())
}
