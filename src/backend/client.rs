//! Remote backend client for tubechat
//!
//! This module defines the `VideoBackend` trait that the session core
//! depends on, along with the `HttpBackend` implementation that speaks the
//! backend's JSON-over-HTTP contract: ingest a video, probe for its summary,
//! and ask questions about its content.

use crate::config::BackendConfig;
use crate::error::{Result, TubechatError};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// Response from a successful video ingestion
///
/// The backend assigns the video id; `title` and `status` are optional
/// because older backend revisions omit them.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestResponse {
    /// Backend-assigned identifier for the ingested video
    pub video_id: String,
    /// Detected transcript language
    #[serde(default)]
    pub language: String,
    /// Video title, when the backend reports one
    #[serde(default)]
    pub title: Option<String>,
    /// Backend processing status string
    #[serde(default)]
    pub status: Option<String>,
}

/// Outcome of a single summary poll attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryProbe {
    /// The summary is ready; carries the full summary text
    Ready(String),
    /// The backend is still generating the summary (HTTP 202)
    Processing,
}

/// Response from the ask-question operation
#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    /// Answer text produced by the backend
    pub answer: String,
}

#[derive(Debug, Serialize)]
struct IngestRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct SummarizeRequest<'a> {
    video_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    video_id: &'a str,
    question: &'a str,
}

/// Remote backend trait
///
/// The session core talks to the inference backend only through this seam,
/// which keeps the orchestration logic independent of the transport and
/// lets tests substitute a scripted backend.
#[async_trait]
pub trait VideoBackend: Send + Sync {
    /// Submit a video reference for ingestion
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the backend rejects the video
    async fn ingest_video(&self, url: &str) -> Result<IngestResponse>;

    /// Ask whether the summary for a video is ready
    ///
    /// Returns [`SummaryProbe::Processing`] when the backend signals that
    /// generation is still in progress (HTTP 202).
    ///
    /// # Errors
    ///
    /// Returns error on any other failure; callers decide whether to retry
    async fn fetch_summary(&self, video_id: &str) -> Result<SummaryProbe>;

    /// Ask a question about an ingested video
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the answer cannot be parsed
    async fn ask_question(&self, video_id: &str, question: &str) -> Result<AskResponse>;
}

/// HTTP implementation of [`VideoBackend`]
///
/// Posts JSON bodies to `/process_video`, `/summarize_video`, and `/chat`
/// under the configured base URL. No client-side timeouts are applied; a
/// stalled call delays only its own caller.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a new HTTP backend client
    ///
    /// # Arguments
    ///
    /// * `config` - Backend configuration containing the base URL
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tubechat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TubechatError::Backend(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();

        tracing::info!("Initialized backend client: base_url={}", base_url);

        Ok(Self { client, base_url })
    }

    /// The configured base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl VideoBackend for HttpBackend {
    async fn ingest_video(&self, url: &str) -> Result<IngestResponse> {
        let endpoint = self.endpoint("/process_video");
        tracing::debug!("Ingesting video: {}", url);

        let response = self
            .client
            .post(&endpoint)
            .json(&IngestRequest { url })
            .send()
            .await
            .map_err(|e| TubechatError::Ingestion(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ingestion rejected with {}: {}", status, error_text);
            return Err(TubechatError::Ingestion(format!(
                "backend returned {}: {}",
                status, error_text
            ))
            .into());
        }

        let ingest: IngestResponse = response.json().await.map_err(|e| {
            TubechatError::Ingestion(format!("failed to parse ingestion response: {}", e))
        })?;

        tracing::info!(
            "Video ingested: id={}, language={}",
            ingest.video_id,
            ingest.language
        );
        Ok(ingest)
    }

    async fn fetch_summary(&self, video_id: &str) -> Result<SummaryProbe> {
        let endpoint = self.endpoint("/summarize_video");
        tracing::debug!("Probing summary for video: {}", video_id);

        let response = self
            .client
            .post(&endpoint)
            .json(&SummarizeRequest { video_id })
            .send()
            .await
            .map_err(|e| TubechatError::Backend(format!("summary request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::ACCEPTED {
            return Ok(SummaryProbe::Processing);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TubechatError::Backend(format!(
                "summary request returned {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: SummarizeResponse = response.json().await.map_err(|e| {
            TubechatError::Backend(format!("failed to parse summary response: {}", e))
        })?;

        // The contract promises a non-empty string on success; an empty body
        // is treated like the in-progress signal.
        if body.summary.is_empty() {
            return Ok(SummaryProbe::Processing);
        }

        Ok(SummaryProbe::Ready(body.summary))
    }

    async fn ask_question(&self, video_id: &str, question: &str) -> Result<AskResponse> {
        let endpoint = self.endpoint("/chat");
        tracing::debug!("Asking question for video: {}", video_id);

        let response = self
            .client
            .post(&endpoint)
            .json(&AskRequest { video_id, question })
            .send()
            .await
            .map_err(|e| TubechatError::Backend(format!("chat request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TubechatError::Backend(format!(
                "chat request returned {}: {}",
                status, error_text
            ))
            .into());
        }

        let answer: AskResponse = response
            .json()
            .await
            .map_err(|e| TubechatError::Backend(format!("failed to parse answer: {}", e)))?;

        Ok(answer)
    }
}
