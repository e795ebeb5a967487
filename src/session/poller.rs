//! Background summary polling
//!
//! After a video is ingested the backend prepares its summary
//! asynchronously. `SummaryPoller` probes the backend on a fixed interval
//! until the summary arrives, then writes it into the shared session state
//! and announces it over the event channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::backend::{SummaryProbe, VideoBackend};
use crate::session::controller::{SessionEvent, SessionState, SummaryState};

/// Handle to a running summary poll task
///
/// Cancelling the handle (explicitly or by dropping it) stops the task
/// before its next probe; a cancelled poller never mutates session state
/// again.
pub struct SummaryPoller {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl SummaryPoller {
    /// Spawn a poll task for the given video
    ///
    /// The first probe fires one full interval after the spawn, not
    /// immediately; the backend almost never has the summary ready that
    /// fast. Probe errors and still-processing responses are logged and
    /// retried on the next tick. The task ends on the first successful
    /// non-empty summary.
    pub fn spawn(
        backend: Arc<dyn VideoBackend>,
        video_id: String,
        interval: Duration,
        state: Arc<RwLock<SessionState>>,
        events: UnboundedSender<SessionEvent>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; consume it so the
            // first probe waits a full interval.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => {
                        debug!("summary poll for {} cancelled", video_id);
                        return;
                    }
                    _ = ticker.tick() => {}
                }

                match backend.fetch_summary(&video_id).await {
                    Ok(SummaryProbe::Ready(summary)) => {
                        let mut guard = state.write().await;
                        // Re-check under the lock so a cancel that raced
                        // this probe still wins.
                        if task_cancel.is_cancelled() {
                            return;
                        }
                        if let Some(video) = guard.video.as_mut() {
                            if video.video_id == video_id {
                                video.summary_text = summary;
                                video.summary_state = SummaryState::Available;
                                info!("summary ready for video {}", video_id);
                                let _ = events.send(SessionEvent::SummaryReady {
                                    video_id: video_id.clone(),
                                });
                            }
                        }
                        return;
                    }
                    Ok(SummaryProbe::Processing) => {
                        debug!("summary for {} still processing", video_id);
                    }
                    Err(err) => {
                        // Transient backend errors do not end the poll
                        debug!("summary probe for {} failed: {}", video_id, err);
                    }
                }
            }
        });

        Self { cancel, handle }
    }

    /// Stop the poll task; idempotent
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SummaryPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::session::controller::VideoSession;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    struct ScriptedBackend {
        probes: AtomicUsize,
        ready_after: usize,
    }

    #[async_trait]
    impl VideoBackend for ScriptedBackend {
        async fn ingest_video(&self, _url: &str) -> Result<crate::backend::IngestResponse> {
            unimplemented!("not used by poller tests")
        }

        async fn fetch_summary(&self, _video_id: &str) -> Result<SummaryProbe> {
            let n = self.probes.fetch_add(1, Ordering::SeqCst);
            if n + 1 >= self.ready_after {
                Ok(SummaryProbe::Ready("the summary".to_string()))
            } else {
                Ok(SummaryProbe::Processing)
            }
        }

        async fn ask_question(
            &self,
            _video_id: &str,
            _question: &str,
        ) -> Result<crate::backend::AskResponse> {
            unimplemented!("not used by poller tests")
        }
    }

    fn state_with_video(video_id: &str) -> Arc<RwLock<SessionState>> {
        let mut state = SessionState::default();
        let mut video = VideoSession::new(
            video_id.to_string(),
            "https://youtu.be/x".to_string(),
            None,
            "en".to_string(),
        );
        video.summary_state = SummaryState::Polling;
        state.video = Some(video);
        Arc::new(RwLock::new(state))
    }

    #[tokio::test]
    async fn test_poller_writes_summary_and_stops() {
        let backend = Arc::new(ScriptedBackend {
            probes: AtomicUsize::new(0),
            ready_after: 2,
        });
        let state = state_with_video("vid-1");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let poller = SummaryPoller::spawn(
            backend.clone(),
            "vid-1".to_string(),
            Duration::from_millis(10),
            state.clone(),
            tx,
        );

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("poller should emit before timeout")
            .expect("channel open");
        assert!(matches!(event, SessionEvent::SummaryReady { ref video_id } if video_id == "vid-1"));

        let guard = state.read().await;
        let video = guard.video.as_ref().unwrap();
        assert_eq!(video.summary_text, "the summary");
        assert_eq!(video.summary_state, SummaryState::Available);
        drop(guard);

        // Give the task a moment to exit, then confirm no extra probes
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(poller.is_finished());
        assert_eq!(backend.probes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_first_probe_waits_one_interval() {
        let backend = Arc::new(ScriptedBackend {
            probes: AtomicUsize::new(0),
            ready_after: 1,
        });
        let state = state_with_video("vid-1");
        let (tx, _rx) = mpsc::unbounded_channel();

        let _poller = SummaryPoller::spawn(
            backend.clone(),
            "vid-1".to_string(),
            Duration::from_millis(100),
            state,
            tx,
        );

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(backend.probes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancelled_poller_never_probes() {
        let backend = Arc::new(ScriptedBackend {
            probes: AtomicUsize::new(0),
            ready_after: 1,
        });
        let state = state_with_video("vid-1");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let poller = SummaryPoller::spawn(
            backend.clone(),
            "vid-1".to_string(),
            Duration::from_millis(20),
            state.clone(),
            tx,
        );
        poller.stop();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(backend.probes.load(Ordering::SeqCst), 0);
        assert!(rx.try_recv().is_err());
        let guard = state.read().await;
        assert_eq!(
            guard.video.as_ref().unwrap().summary_state,
            SummaryState::Polling
        );
    }

    #[tokio::test]
    async fn test_probe_errors_are_retried() {
        struct FlakyBackend {
            probes: AtomicUsize,
        }

        #[async_trait]
        impl VideoBackend for FlakyBackend {
            async fn ingest_video(&self, _url: &str) -> Result<crate::backend::IngestResponse> {
                unimplemented!()
            }

            async fn fetch_summary(&self, _video_id: &str) -> Result<SummaryProbe> {
                let n = self.probes.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    Err(crate::error::TubechatError::Backend("boom".to_string()).into())
                } else {
                    Ok(SummaryProbe::Ready("recovered".to_string()))
                }
            }

            async fn ask_question(
                &self,
                _video_id: &str,
                _question: &str,
            ) -> Result<crate::backend::AskResponse> {
                unimplemented!()
            }
        }

        let backend = Arc::new(FlakyBackend {
            probes: AtomicUsize::new(0),
        });
        let state = state_with_video("vid-1");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let _poller = SummaryPoller::spawn(
            backend,
            "vid-1".to_string(),
            Duration::from_millis(10),
            state.clone(),
            tx,
        );

        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("poller should recover")
            .expect("channel open");
        assert!(matches!(event, SessionEvent::SummaryReady { .. }));
        let guard = state.read().await;
        assert_eq!(guard.video.as_ref().unwrap().summary_text, "recovered");
    }
}
