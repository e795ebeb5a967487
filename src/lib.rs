//! Tubechat - Chat with YouTube videos from the terminal
//!
//! This library provides the core functionality for the tubechat CLI: a
//! backend client for video ingestion and chat, session orchestration with
//! background summary polling, and the interactive command loop.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `backend`: HTTP client for the video-processing backend
//! - `session`: Session state, summary polling, chat transcript, and the
//!   controller that ties them together
//! - `commands`: Command handlers for the CLI (interactive chat, one-shot
//!   summarize) and the special-command parser
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use tubechat::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     // Session usage would go here
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod session;

// Re-export commonly used types
pub use backend::{HttpBackend, VideoBackend};
pub use config::Config;
pub use error::{Result, TubechatError};
pub use session::{
    parse_summary, BusyFlags, SessionController, SessionEvent, SessionSnapshot, SessionStatus,
    SummaryDocument, SummaryState,
};
