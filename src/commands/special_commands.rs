//! Special commands parser for interactive chat mode
//!
//! This module parses the special commands that can be entered during an
//! interactive chat session. Special commands allow users to:
//! - Load a video by URL
//! - Reset the session for a new video
//! - Clear the current chat transcript
//! - Show the summary and session status
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive; URLs keep
//! their original casing.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },

    /// Command was given an argument it does not take
    #[error("Command {command} takes no argument, got: {arg}")]
    UnexpectedArgument { command: String, arg: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands drive the session rather than being sent to the
/// backend as questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Load a video by URL
    ///
    /// Replaces the current video (if any) and starts summary polling.
    LoadVideo(String),

    /// Reset the session for a new video
    ///
    /// Discards the current video, its summary, and the chat transcript.
    NewVideo,

    /// Clear the chat transcript
    ///
    /// Keeps the current video and its summary.
    ClearChat,

    /// Print the summary for the current video
    ShowSummary,

    /// Display current session status
    ///
    /// Shows the video, summary progress, and transcript length.
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the backend as a chat question.
    None,
}

/// Parse a user input string into a special command
///
/// Checks if the input matches any special command pattern. Command names
/// are case-insensitive; the argument to `/video` keeps its casing.
///
/// # Arguments
///
/// * `input` - The user input string to parse
///
/// # Returns
///
/// Returns Ok(SpecialCommand) for valid commands or SpecialCommand::None
/// for non-commands. Returns Err(CommandError) for invalid commands or
/// invalid arguments.
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is
/// not a valid command.
/// Returns CommandError::MissingArgument if `/video` is given no URL.
/// Returns CommandError::UnexpectedArgument if a no-argument command is
/// given one.
///
/// # Examples
///
/// ```
/// use tubechat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/video https://youtu.be/abc").unwrap();
/// assert_eq!(cmd, SpecialCommand::LoadVideo("https://youtu.be/abc".to_string()));
///
/// let cmd = parse_special_command("what is this video about?").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// // Invalid command returns error
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    match lower.as_str() {
        // Video loading
        "/video" => Err(CommandError::MissingArgument {
            command: "/video".to_string(),
            usage: "/video <url>".to_string(),
        }),
        _ if lower.starts_with("/video ") => {
            // Take the URL from the original input so casing survives
            let url = trimmed["/video ".len()..].trim();
            if url.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/video".to_string(),
                    usage: "/video <url>".to_string(),
                })
            } else {
                Ok(SpecialCommand::LoadVideo(url.to_string()))
            }
        }

        // Session resets
        "/new" => Ok(SpecialCommand::NewVideo),
        "/clear" => Ok(SpecialCommand::ClearChat),

        // Session information
        "/summary" => Ok(SpecialCommand::ShowSummary),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),

        // Exit commands
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        // No-argument commands given an argument
        _ if lower.starts_with("/new ")
            || lower.starts_with("/clear ")
            || lower.starts_with("/summary ")
            || lower.starts_with("/status ") =>
        {
            let mut parts = lower.splitn(2, ' ');
            let command = parts.next().unwrap_or_default().to_string();
            let arg = parts.next().unwrap_or_default().trim().to_string();
            Err(CommandError::UnexpectedArgument { command, arg })
        }

        // Unknown command starting with "/"
        _ if lower.starts_with('/') => {
            let cmd = lower.split_whitespace().next().unwrap_or(&lower);
            Err(CommandError::UnknownCommand(cmd.to_string()))
        }

        // Not a special command
        _ => Ok(SpecialCommand::None),
    }
}

/// Display help text for special commands
///
/// Shows all available special commands with their descriptions
/// and usage examples.
///
/// # Examples
///
/// ```
/// use tubechat::commands::special_commands::print_help;
///
/// print_help();
/// ```
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

VIDEO:
  /video <url>    - Load a video and start summarizing it
  /new            - Discard the current video and start over
  /summary        - Print the summary for the current video

CHAT:
  /clear          - Clear the chat transcript (keeps the video)

SESSION INFORMATION:
  /status         - Show the current video and summary progress
  /help           - Show this help message
  /?              - Same as /help

SESSION CONTROL:
  exit            - Exit interactive mode
  quit            - Same as exit

NOTES:
  - Commands are case-insensitive; URLs keep their casing
  - Regular text (not starting with /) is sent as a question
  - Questions need a loaded video; use /video first
  - The summary is fetched in the background and prints when ready
"#
    );
}
