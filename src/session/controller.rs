//! Session orchestration
//!
//! `SessionController` owns the lifecycle of the active video: submitting a
//! URL for ingestion, polling for its summary in the background, running the
//! per-video chat, and resetting for the next video. All mutation goes
//! through the controller; callers observe the session through snapshots and
//! the event channel.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::backend::VideoBackend;
use crate::config::Config;
use crate::error::Result;
use crate::session::conversation::{ChatConversation, ChatMessage, FALLBACK_ANSWER};
use crate::session::poller::SummaryPoller;
use crate::session::summary::{parse_summary, SummaryDocument};

/// Progress of the active video's summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryState {
    /// The session exists but no poll has been scheduled yet
    NotStarted,
    /// Background polling is in flight and no summary has landed
    Polling,
    /// The summary text arrived and is stored on the session
    Available,
    /// Reserved for a future polling ceiling; never set today
    Failed,
}

/// Coarse lifecycle phase of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No video loaded
    Empty,
    /// A URL is being ingested
    Submitting,
    /// A video is loaded and chat is available
    Ready,
}

/// The active video and everything derived from it
#[derive(Debug, Clone)]
pub struct VideoSession {
    pub video_id: String,
    pub url: String,
    pub title: Option<String>,
    pub language: String,
    pub summary_state: SummaryState,
    pub summary_text: String,
}

impl VideoSession {
    pub fn new(video_id: String, url: String, title: Option<String>, language: String) -> Self {
        Self {
            video_id,
            url,
            title,
            language,
            summary_state: SummaryState::NotStarted,
            summary_text: String::new(),
        }
    }
}

/// Shared mutable session state
///
/// Guarded by a `tokio::sync::RwLock`; lock scopes stay short and never
/// span an await point.
#[derive(Debug, Default)]
pub struct SessionState {
    pub video: Option<VideoSession>,
    pub submitting: bool,
    pub conversation: ChatConversation,
}

/// Announcements from background work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The summary for the named video landed in session state
    SummaryReady { video_id: String },
}

/// Which operations are currently in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BusyFlags {
    /// A URL submission is awaiting the ingestion response
    pub ingesting: bool,
    /// The background poll has not yet delivered a summary
    pub summarizing: bool,
    /// A question is awaiting its answer
    pub chatting: bool,
}

/// Read-only view of the session at one instant
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub video_id: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub language: Option<String>,
    pub summary_state: Option<SummaryState>,
    pub summary: Option<SummaryDocument>,
    pub messages: Vec<ChatMessage>,
    pub busy: BusyFlags,
}

/// Orchestrates ingestion, summary polling, and chat for one video at a time
pub struct SessionController {
    backend: Arc<dyn VideoBackend>,
    state: Arc<RwLock<SessionState>>,
    events: UnboundedSender<SessionEvent>,
    poller: Option<SummaryPoller>,
    poll_interval: std::time::Duration,
}

impl SessionController {
    /// Create a controller and the receiving end of its event channel
    pub fn new(
        backend: Arc<dyn VideoBackend>,
        config: &Config,
    ) -> (Self, UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            backend,
            state: Arc::new(RwLock::new(SessionState::default())),
            events,
            poller: None,
            poll_interval: config.poller.interval(),
        };
        (controller, receiver)
    }

    /// Submit a video URL for ingestion
    ///
    /// Blank URLs and submissions while another ingestion is in flight are
    /// ignored. A successful submission replaces the previous video (its
    /// poller is cancelled first) and starts polling for the new summary.
    /// On failure the session reverts to empty and the error propagates.
    ///
    /// # Errors
    ///
    /// Returns `TubechatError::Ingestion` when the backend rejects the URL
    /// or cannot be reached.
    pub async fn submit_video(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if url.is_empty() {
            warn!("ignoring blank video URL");
            return Ok(());
        }

        {
            let guard = self.state.read().await;
            if guard.submitting {
                warn!("ignoring submission while another is in flight");
                return Ok(());
            }
        }

        // Stop any poll for the outgoing video before touching state
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }

        {
            let mut guard = self.state.write().await;
            guard.video = None;
            // Fresh transcript, including the pending flag; only
            // clear_chat preserves it for an in-flight answer
            guard.conversation = ChatConversation::new();
            guard.submitting = true;
        }

        info!("submitting video {}", url);
        match self.backend.ingest_video(url).await {
            Ok(response) => {
                let mut video = VideoSession::new(
                    response.video_id.clone(),
                    url.to_string(),
                    response.title,
                    response.language,
                );
                // The poller is spawned right below
                video.summary_state = SummaryState::Polling;
                {
                    let mut guard = self.state.write().await;
                    guard.video = Some(video);
                    guard.submitting = false;
                }
                info!("video {} ingested as {}", url, response.video_id);
                self.poller = Some(SummaryPoller::spawn(
                    self.backend.clone(),
                    response.video_id,
                    self.poll_interval,
                    self.state.clone(),
                    self.events.clone(),
                ));
                Ok(())
            }
            Err(err) => {
                let mut guard = self.state.write().await;
                guard.video = None;
                guard.submitting = false;
                drop(guard);
                error!("video ingestion failed: {}", err);
                Err(err)
            }
        }
    }

    /// Ask a question about the active video
    ///
    /// The question is appended to the transcript before the backend call
    /// so the user sees it immediately. A backend failure appends the
    /// fixed fallback line instead of an answer. Returns the assistant
    /// text that was appended, or `None` when the question was ignored
    /// (blank input, no video, ingestion or another answer in flight).
    pub async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(None);
        }

        let video_id = {
            let mut guard = self.state.write().await;
            if guard.submitting {
                warn!("ignoring question while ingestion is in flight");
                return Ok(None);
            }
            let Some(video) = guard.video.as_ref() else {
                warn!("ignoring question: no video loaded");
                return Ok(None);
            };
            if guard.conversation.is_pending() {
                warn!("ignoring question while an answer is pending");
                return Ok(None);
            }
            let video_id = video.video_id.clone();
            guard.conversation.push_user(question);
            video_id
        };

        match self.backend.ask_question(&video_id, question).await {
            Ok(response) => {
                let mut guard = self.state.write().await;
                guard.conversation.push_assistant(response.answer.clone());
                Ok(Some(response.answer))
            }
            Err(err) => {
                error!("chat request failed: {}", err);
                let mut guard = self.state.write().await;
                guard.conversation.push_fallback();
                Ok(Some(FALLBACK_ANSWER.to_string()))
            }
        }
    }

    /// Discard the active video, its transcript, and any running poll
    pub async fn start_new_video(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        let mut guard = self.state.write().await;
        guard.video = None;
        guard.submitting = false;
        guard.conversation = ChatConversation::new();
        info!("session reset");
    }

    /// Clear the chat transcript while keeping the video and its summary
    pub async fn clear_chat(&mut self) {
        let mut guard = self.state.write().await;
        guard.conversation.clear();
    }

    /// Capture the current session as an immutable snapshot
    pub async fn snapshot(&self) -> SessionSnapshot {
        let guard = self.state.read().await;
        let status = if guard.submitting {
            SessionStatus::Submitting
        } else if guard.video.is_some() {
            SessionStatus::Ready
        } else {
            SessionStatus::Empty
        };

        let summary = guard.video.as_ref().and_then(|video| {
            if video.summary_state == SummaryState::Available {
                Some(parse_summary(&video.summary_text))
            } else {
                None
            }
        });

        SessionSnapshot {
            status,
            video_id: guard.video.as_ref().map(|v| v.video_id.clone()),
            url: guard.video.as_ref().map(|v| v.url.clone()),
            title: guard.video.as_ref().and_then(|v| v.title.clone()),
            language: guard.video.as_ref().map(|v| v.language.clone()),
            summary_state: guard.video.as_ref().map(|v| v.summary_state),
            summary,
            messages: guard.conversation.messages().to_vec(),
            busy: BusyFlags {
                ingesting: guard.submitting,
                summarizing: guard
                    .video
                    .as_ref()
                    .map(|v| v.summary_state == SummaryState::Polling)
                    .unwrap_or(false),
                chatting: guard.conversation.is_pending(),
            },
        }
    }

    /// True when a video is loaded and questions will be accepted
    pub async fn is_ready(&self) -> bool {
        let guard = self.state.read().await;
        !guard.submitting && guard.video.is_some()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AskResponse, IngestResponse, SummaryProbe};
    use crate::config::Config;
    use crate::error::TubechatError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FakeBackend {
        fail_ingest: AtomicBool,
        fail_chat: AtomicBool,
        ingest_calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                fail_ingest: AtomicBool::new(false),
                fail_chat: AtomicBool::new(false),
                ingest_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl VideoBackend for FakeBackend {
        async fn ingest_video(&self, url: &str) -> Result<IngestResponse> {
            self.ingest_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_ingest.load(Ordering::SeqCst) {
                return Err(TubechatError::Ingestion("bad url".to_string()).into());
            }
            Ok(IngestResponse {
                video_id: format!("id-for-{}", url.len()),
                language: "en".to_string(),
                title: Some("A Video".to_string()),
                status: None,
            })
        }

        async fn fetch_summary(&self, _video_id: &str) -> Result<SummaryProbe> {
            Ok(SummaryProbe::Processing)
        }

        async fn ask_question(&self, _video_id: &str, question: &str) -> Result<AskResponse> {
            if self.fail_chat.load(Ordering::SeqCst) {
                return Err(TubechatError::Backend("down".to_string()).into());
            }
            Ok(AskResponse {
                answer: format!("answer to: {}", question),
            })
        }
    }

    fn controller_with(backend: Arc<FakeBackend>) -> SessionController {
        let config = Config::default();
        let (controller, _events) = SessionController::new(backend, &config);
        controller
    }

    #[tokio::test]
    async fn test_fresh_controller_is_empty() {
        let controller = controller_with(FakeBackend::new());
        let snap = controller.snapshot().await;
        assert_eq!(snap.status, SessionStatus::Empty);
        assert!(snap.video_id.is_none());
        assert!(snap.messages.is_empty());
    }

    #[tokio::test]
    async fn test_submit_video_reaches_ready() {
        let mut controller = controller_with(FakeBackend::new());
        controller.submit_video("https://youtu.be/abc").await.unwrap();
        let snap = controller.snapshot().await;
        assert_eq!(snap.status, SessionStatus::Ready);
        assert_eq!(snap.language.as_deref(), Some("en"));
        assert_eq!(snap.title.as_deref(), Some("A Video"));
        assert_eq!(snap.summary_state, Some(SummaryState::Polling));
        assert!(snap.summary.is_none());
    }

    #[tokio::test]
    async fn test_blank_url_is_ignored() {
        let mut controller = controller_with(FakeBackend::new());
        controller.submit_video("   ").await.unwrap();
        let snap = controller.snapshot().await;
        assert_eq!(snap.status, SessionStatus::Empty);
    }

    #[tokio::test]
    async fn test_submit_while_submitting_is_ignored() {
        let backend = FakeBackend::new();
        let mut controller = controller_with(backend.clone());
        {
            let mut guard = controller.state.write().await;
            guard.submitting = true;
        }
        controller.submit_video("https://youtu.be/abc").await.unwrap();
        // No duplicate ingestion request was issued
        assert_eq!(backend.ingest_calls.load(Ordering::SeqCst), 0);
        let snap = controller.snapshot().await;
        assert_eq!(snap.status, SessionStatus::Submitting);
        assert!(snap.video_id.is_none());
    }

    #[tokio::test]
    async fn test_ask_while_pending_is_ignored() {
        let mut controller = controller_with(FakeBackend::new());
        controller.submit_video("https://youtu.be/abc").await.unwrap();
        {
            let mut guard = controller.state.write().await;
            guard.conversation.push_user("first question");
        }
        let answer = controller.ask("second question").await.unwrap();
        assert!(answer.is_none());
        let snap = controller.snapshot().await;
        assert_eq!(snap.messages.len(), 1);
        assert_eq!(snap.messages[0].content, "first question");
        assert!(snap.busy.chatting);
    }

    #[tokio::test]
    async fn test_failed_ingestion_reverts_to_empty() {
        let backend = FakeBackend::new();
        backend.fail_ingest.store(true, Ordering::SeqCst);
        let mut controller = controller_with(backend);
        let result = controller.submit_video("https://youtu.be/abc").await;
        assert!(result.is_err());
        let snap = controller.snapshot().await;
        assert_eq!(snap.status, SessionStatus::Empty);
        assert!(snap.video_id.is_none());
    }

    #[tokio::test]
    async fn test_resubmission_replaces_video_and_chat() {
        let mut controller = controller_with(FakeBackend::new());
        controller.submit_video("https://youtu.be/first").await.unwrap();
        controller.ask("what is it about?").await.unwrap();
        controller.submit_video("https://youtu.be/second-longer").await.unwrap();
        let snap = controller.snapshot().await;
        assert_eq!(snap.status, SessionStatus::Ready);
        assert_eq!(snap.url.as_deref(), Some("https://youtu.be/second-longer"));
        assert!(snap.messages.is_empty());
    }

    #[tokio::test]
    async fn test_ask_appends_question_and_answer() {
        let mut controller = controller_with(FakeBackend::new());
        controller.submit_video("https://youtu.be/abc").await.unwrap();
        let answer = controller.ask("what is it about?").await.unwrap();
        assert_eq!(answer.as_deref(), Some("answer to: what is it about?"));
        let snap = controller.snapshot().await;
        assert_eq!(snap.messages.len(), 2);
        assert_eq!(snap.messages[0].content, "what is it about?");
        assert!(!snap.busy.chatting);
    }

    #[tokio::test]
    async fn test_ask_without_video_is_ignored() {
        let mut controller = controller_with(FakeBackend::new());
        let answer = controller.ask("anyone there?").await.unwrap();
        assert!(answer.is_none());
        let snap = controller.snapshot().await;
        assert!(snap.messages.is_empty());
    }

    #[tokio::test]
    async fn test_ask_blank_question_is_ignored() {
        let mut controller = controller_with(FakeBackend::new());
        controller.submit_video("https://youtu.be/abc").await.unwrap();
        let answer = controller.ask("  \t ").await.unwrap();
        assert!(answer.is_none());
    }

    #[tokio::test]
    async fn test_chat_failure_appends_fallback() {
        let backend = FakeBackend::new();
        let mut controller = controller_with(backend.clone());
        controller.submit_video("https://youtu.be/abc").await.unwrap();
        backend.fail_chat.store(true, Ordering::SeqCst);
        let answer = controller.ask("hello?").await.unwrap();
        assert_eq!(answer.as_deref(), Some(FALLBACK_ANSWER));
        let snap = controller.snapshot().await;
        assert_eq!(snap.messages.len(), 2);
        assert_eq!(snap.messages[1].content, FALLBACK_ANSWER);
        assert!(!snap.busy.chatting);
    }

    #[tokio::test]
    async fn test_chat_keeps_working_after_fallback() {
        let backend = FakeBackend::new();
        let mut controller = controller_with(backend.clone());
        controller.submit_video("https://youtu.be/abc").await.unwrap();
        backend.fail_chat.store(true, Ordering::SeqCst);
        controller.ask("first?").await.unwrap();
        backend.fail_chat.store(false, Ordering::SeqCst);
        let answer = controller.ask("second?").await.unwrap();
        assert_eq!(answer.as_deref(), Some("answer to: second?"));
        let snap = controller.snapshot().await;
        assert_eq!(snap.messages.len(), 4);
    }

    #[tokio::test]
    async fn test_start_new_video_resets_everything() {
        let mut controller = controller_with(FakeBackend::new());
        controller.submit_video("https://youtu.be/abc").await.unwrap();
        controller.ask("question").await.unwrap();
        controller.start_new_video().await;
        let snap = controller.snapshot().await;
        assert_eq!(snap.status, SessionStatus::Empty);
        assert!(snap.video_id.is_none());
        assert!(snap.messages.is_empty());
    }

    #[tokio::test]
    async fn test_clear_chat_keeps_video() {
        let mut controller = controller_with(FakeBackend::new());
        controller.submit_video("https://youtu.be/abc").await.unwrap();
        controller.ask("question").await.unwrap();
        controller.clear_chat().await;
        let snap = controller.snapshot().await;
        assert_eq!(snap.status, SessionStatus::Ready);
        assert!(snap.messages.is_empty());
        assert!(snap.video_id.is_some());
    }

    #[tokio::test]
    async fn test_snapshot_parses_available_summary() {
        let mut controller = controller_with(FakeBackend::new());
        controller.submit_video("https://youtu.be/abc").await.unwrap();
        {
            let mut guard = controller.state.write().await;
            let video = guard.video.as_mut().unwrap();
            video.summary_text = "Overview.\n###\n- one\n- two".to_string();
            video.summary_state = SummaryState::Available;
        }
        let snap = controller.snapshot().await;
        let summary = snap.summary.expect("summary should be parsed");
        assert_eq!(summary.abstract_text, "Overview.");
        assert_eq!(summary.points, vec!["one", "two"]);
    }
}
