//! Command-line interface definition for tubechat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat and one-shot summarization.

use clap::{Parser, Subcommand};

/// tubechat - Summarize and chat with videos from the terminal
///
/// Submits a video reference to a remote inference backend, waits for an
/// asynchronously generated summary, and holds a multi-turn conversation
/// about the video's content.
#[derive(Parser, Debug, Clone)]
#[command(name = "tubechat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the backend base URL from config
    #[arg(long, env = "TUBECHAT_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for tubechat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Video URL to ingest before entering the session
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Ingest a video, wait for its summary, print it, and exit
    Summarize {
        /// Video URL to summarize
        #[arg(short, long)]
        url: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            backend_url: None,
            command: Commands::Chat { url: None },
        }
    }
}
