//! Per-video chat transcript
//!
//! Holds the append-only message list for the active video. The transcript
//! never reorders or edits messages; user questions are appended
//! optimistically before the backend answers, and a fixed fallback line is
//! appended when the backend fails.

use serde::Serialize;

/// Fallback assistant line shown when the backend chat call fails
pub const FALLBACK_ANSWER: &str = "Sorry, something went wrong.";

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single chat message in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only chat transcript for one video
///
/// The `pending` flag is set while a question is in flight; the controller
/// rejects new questions until the pending answer (or fallback) lands.
#[derive(Debug, Default, Clone)]
pub struct ChatConversation {
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl ChatConversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the user's question and mark an answer as pending
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
        self.pending = true;
    }

    /// Append the assistant's answer and clear the pending flag
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
        self.pending = false;
    }

    /// Append the fixed fallback answer and clear the pending flag
    pub fn push_fallback(&mut self) {
        self.push_assistant(FALLBACK_ANSWER);
    }

    /// True while a question awaits its answer
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drop the transcript
    ///
    /// Does not touch the `pending` flag: an answer already in flight still
    /// lands in the (now shorter) log and clears the flag itself when it
    /// resolves.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
