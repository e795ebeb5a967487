//! Session state, summary polling, and chat orchestration

pub mod controller;
pub mod conversation;
pub mod poller;
pub mod summary;

pub use controller::{
    BusyFlags, SessionController, SessionEvent, SessionSnapshot, SessionState, SessionStatus,
    SummaryState, VideoSession,
};
pub use conversation::{ChatConversation, ChatMessage, Role, FALLBACK_ANSWER};
pub use poller::SummaryPoller;
pub use summary::{parse_summary, SummaryDocument};
