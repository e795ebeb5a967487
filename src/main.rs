//! Tubechat - Chat with YouTube videos from the terminal
//!
#![doc = "Tubechat - Chat with YouTube videos from the terminal"]
#![doc = "Main entry point for the tubechat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tubechat::cli::{Cli, Commands};
use tubechat::commands;
use tubechat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { url } => {
            tracing::info!("Starting interactive chat mode");
            if let Some(u) = &url {
                tracing::debug!("Loading video on startup: {}", u);
            }

            // Moves `config` into the handler (match arms are exclusive)
            commands::chat::run_chat(config, url).await?;
            Ok(())
        }
        Commands::Summarize { url } => {
            tracing::info!("Starting one-shot summarize mode");
            commands::summarize::run_summarize(config, url).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "tubechat=debug"
    } else {
        "tubechat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
