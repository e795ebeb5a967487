/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes two top-level command modules:

- `chat`      — Interactive chat mode for a loaded video
- `summarize` — One-shot summary of a single video URL

These handlers are intentionally small and use the library components:
the backend client and the session controller.
*/

use crate::session::{SessionSnapshot, SessionStatus, SummaryState};

// Special commands parser for the interactive loop
pub mod special_commands;

/// Print a parsed summary, or a progress note when it is not ready yet
fn print_summary(snapshot: &SessionSnapshot) {
    use colored::Colorize;

    match snapshot.status {
        SessionStatus::Empty => {
            println!("{}", "No video loaded. Use /video <url> first.".yellow());
            return;
        }
        SessionStatus::Submitting => {
            println!("{}", "The video is still being processed.".yellow());
            return;
        }
        SessionStatus::Ready => {}
    }

    match &snapshot.summary {
        Some(summary) => {
            if let Some(title) = &snapshot.title {
                println!("\n{}", title.bold());
            }
            if !summary.abstract_text.is_empty() {
                println!("\n{}", summary.abstract_text);
            }
            if !summary.points.is_empty() {
                println!();
                for point in &summary.points {
                    println!("  {} {}", "•".cyan(), point);
                }
            }
            println!();
        }
        None => {
            println!(
                "{}",
                "The summary is still being prepared; it will print when ready.".yellow()
            );
        }
    }
}

/// Print the session status display
fn print_status_display(snapshot: &SessionSnapshot) {
    use colored::Colorize;

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Tubechat Session Status                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    let status = match snapshot.status {
        SessionStatus::Empty => "empty".yellow(),
        SessionStatus::Submitting => "submitting".cyan(),
        SessionStatus::Ready => "ready".green(),
    };
    println!("Session:   {}", status);
    if let Some(url) = &snapshot.url {
        println!("Video:     {}", url);
    }
    if let Some(title) = &snapshot.title {
        println!("Title:     {}", title);
    }
    if let Some(language) = &snapshot.language {
        println!("Language:  {}", language);
    }
    if let Some(state) = snapshot.summary_state {
        let label = match state {
            SummaryState::NotStarted => "not started".yellow(),
            SummaryState::Polling => "in progress".cyan(),
            SummaryState::Available => "available".green(),
            SummaryState::Failed => "failed".red(),
        };
        println!("Summary:   {}", label);
    }
    println!("Messages:  {}", snapshot.messages.len());
    println!();
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Creates the backend client and session controller, then runs a
    //! readline-based loop that dispatches special commands and sends
    //! everything else to the backend as a question about the video.

    use super::*;
    use crate::backend::{HttpBackend, VideoBackend};
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::config::Config;
    use crate::error::Result;
    use crate::session::{SessionController, SessionEvent};
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::sync::Arc;
    use tokio::sync::mpsc::UnboundedReceiver;

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `url` - Optional video URL to load before the first prompt
    ///
    /// # Examples
    ///
    /// ```
    /// use tubechat::commands::chat;
    /// use tubechat::config::Config;
    ///
    /// // In application code:
    /// // chat::run_chat(Config::default(), None).await?;
    /// ```
    pub async fn run_chat(config: Config, url: Option<String>) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let backend: Arc<dyn VideoBackend> = Arc::new(HttpBackend::new(&config.backend)?);
        let (mut controller, mut events) = SessionController::new(backend, &config);

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&config.backend.base_url);

        if let Some(url) = url {
            load_video(&mut controller, &url).await;
        }

        loop {
            drain_events(&mut events, &controller).await;

            match rl.readline("tubechat> ") {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    match parse_special_command(input) {
                        Ok(SpecialCommand::LoadVideo(url)) => {
                            load_video(&mut controller, &url).await;
                        }
                        Ok(SpecialCommand::NewVideo) => {
                            controller.start_new_video().await;
                            println!("Session reset. Load a video with /video <url>.\n");
                        }
                        Ok(SpecialCommand::ClearChat) => {
                            controller.clear_chat().await;
                            println!("Chat transcript cleared.\n");
                        }
                        Ok(SpecialCommand::ShowSummary) => {
                            print_summary(&controller.snapshot().await);
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status_display(&controller.snapshot().await);
                        }
                        Ok(SpecialCommand::Help) => {
                            print_help();
                        }
                        Ok(SpecialCommand::Exit) => {
                            break;
                        }
                        Ok(SpecialCommand::None) => {
                            if !controller.is_ready().await {
                                println!(
                                    "{}",
                                    "No video loaded. Use /video <url> first.".yellow()
                                );
                                continue;
                            }
                            match controller.ask(input).await {
                                Ok(Some(answer)) => println!("\n{}\n", answer),
                                Ok(None) => {}
                                Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                            }
                        }
                        Err(e) => {
                            eprintln!("{}", format!("{}", e).red());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(e) => {
                    eprintln!("Readline error: {}", e);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Submit a URL, reporting the outcome on the terminal
    async fn load_video(controller: &mut SessionController, url: &str) {
        println!("Processing video, this may take a moment...");
        match controller.submit_video(url).await {
            Ok(()) => {
                let snapshot = controller.snapshot().await;
                if let Some(title) = &snapshot.title {
                    println!("{} {}\n", "Loaded:".green(), title);
                } else if snapshot.status == SessionStatus::Ready {
                    println!("{}\n", "Video loaded.".green());
                }
                println!("Ask a question, or wait for the summary to print.\n");
            }
            Err(e) => {
                eprintln!("{}", format!("Error: {}", e).red());
            }
        }
    }

    /// Print any summaries that landed since the last prompt
    async fn drain_events(events: &mut UnboundedReceiver<SessionEvent>, controller: &SessionController) {
        while let Ok(event) = events.try_recv() {
            match event {
                SessionEvent::SummaryReady { .. } => {
                    println!("\n{}", "Summary ready:".green().bold());
                    print_summary(&controller.snapshot().await);
                }
            }
        }
    }

    /// Display welcome banner with the configured backend
    fn print_welcome_banner(base_url: &str) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║         Tubechat Interactive Chat Mode - Welcome!            ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Backend: {}", base_url);
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }
}

// Summarize command handler
pub mod summarize {
    //! One-shot summary handler.
    //!
    //! Submits a single URL, waits for the background poll to deliver the
    //! summary, prints it, and exits.

    use super::*;
    use crate::backend::{HttpBackend, VideoBackend};
    use crate::config::Config;
    use crate::error::{Result, TubechatError};
    use crate::session::{SessionController, SessionEvent};
    use std::sync::Arc;

    /// Summarize one video URL and print the result
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `url` - The video URL to summarize
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is blank, ingestion fails, or the
    /// poll ends without a summary.
    pub async fn run_summarize(config: Config, url: String) -> Result<()> {
        // The controller treats a blank URL as a no-op; without a session
        // there is no poller and nothing would ever arrive on the channel.
        let url = url.trim().to_string();
        if url.is_empty() {
            return Err(TubechatError::Ingestion("video URL must not be empty".to_string()).into());
        }

        tracing::info!("Summarizing {}", url);

        let backend: Arc<dyn VideoBackend> = Arc::new(HttpBackend::new(&config.backend)?);
        let (mut controller, mut events) = SessionController::new(backend, &config);

        println!("Processing video, this may take a moment...");
        controller.submit_video(&url).await?;

        match events.recv().await {
            Some(SessionEvent::SummaryReady { .. }) => {
                print_summary(&controller.snapshot().await);
                Ok(())
            }
            None => Err(
                TubechatError::Backend("summary poll ended unexpectedly".to_string()).into(),
            ),
        }
    }
}
