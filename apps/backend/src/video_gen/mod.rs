//! Text-to-video generation behind an injectable trait.
//!
//! The orchestrator only sees [`VideoGenerator`]; `main` picks the
//! implementation (hosted Runware API or the in-process fake).

mod fake;
mod runware;

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

pub use fake::{FakeMode, FakeVideoGenerator};
pub use runware::{RunwareClient, RunwareConfig};

pub type VideoGenResult<T> = Result<T, VideoGenError>;

#[derive(Debug, thiserror::Error)]
pub enum VideoGenError {
    #[error("video API request failed: {0}")]
    Api(String),

    #[error("video generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid video generator configuration: {0}")]
    Config(String),

    #[error("video API response parsing failed: {0}")]
    Parse(String),

    #[error("video API returned no result")]
    NoResult,
}

impl VideoGenError {
    /// Client-safe message; the raw upstream text stays in the logs.
    pub fn public_detail(&self) -> String {
        match self {
            VideoGenError::Api(_) => "The video service returned an error".to_string(),
            VideoGenError::Timeout(after) => {
                format!("The video service did not answer within {}s", after.as_secs())
            }
            VideoGenError::Config(_) => "Video generation is not configured".to_string(),
            VideoGenError::Parse(_) => "Unexpected response from the video service".to_string(),
            VideoGenError::NoResult => "The video service returned no video".to_string(),
        }
    }
}

/// One prompt to render.
#[derive(Debug, Clone)]
pub struct VideoRequest {
    pub task_uuid: Uuid,
    pub prompt: String,
    /// Upper bound for the whole generation, polling included.
    pub timeout: Duration,
}

impl VideoRequest {
    pub fn new(prompt: impl Into<String>, timeout: Duration) -> Self {
        Self {
            task_uuid: Uuid::new_v4(),
            prompt: prompt.into(),
            timeout,
        }
    }
}

/// A finished video as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedVideo {
    pub task_uuid: Uuid,
    pub video_url: String,
    pub status: String,
    pub model: String,
    pub width: i32,
    pub height: i32,
    pub cost: Option<f64>,
    pub seed: Option<i64>,
    pub latency_ms: u64,
}

#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Render `request.prompt` and return the hosted video.
    async fn generate(&self, request: VideoRequest) -> VideoGenResult<GeneratedVideo>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}
