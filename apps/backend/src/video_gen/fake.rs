use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{GeneratedVideo, VideoGenError, VideoGenResult, VideoGenerator, VideoRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeMode {
    /// Return a deterministic URL derived from the task id.
    Succeed,
    /// Fail every call with an API error.
    Fail,
    /// Sleep before succeeding; pair with a short timeout.
    Slow(Duration),
}

/// In-process generator for tests and local runs without API credentials.
#[derive(Debug, Clone)]
pub struct FakeVideoGenerator {
    mode: FakeMode,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeVideoGenerator {
    pub fn new(mode: FakeMode) -> Self {
        Self {
            mode,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(FakeMode::Succeed)
    }

    pub fn failing() -> Self {
        Self::new(FakeMode::Fail)
    }

    pub fn slow(delay: Duration) -> Self {
        Self::new(FakeMode::Slow(delay))
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn url_for(task_uuid: &uuid::Uuid) -> String {
        format!("https://videos.fake.local/{task_uuid}.mp4")
    }
}

#[async_trait]
impl VideoGenerator for FakeVideoGenerator {
    async fn generate(&self, request: VideoRequest) -> VideoGenResult<GeneratedVideo> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt.clone());
        }

        match &self.mode {
            FakeMode::Fail => {
                return Err(VideoGenError::Api("fake generator configured to fail".into()))
            }
            FakeMode::Slow(delay) => tokio::time::sleep(*delay).await,
            FakeMode::Succeed => {}
        }

        Ok(GeneratedVideo {
            task_uuid: request.task_uuid,
            video_url: Self::url_for(&request.task_uuid),
            status: "success".to_string(),
            model: "fake:1@1".to_string(),
            width: 864,
            height: 480,
            cost: Some(0.0),
            seed: Some(42),
            latency_ms: 0,
        })
    }

    fn name(&self) -> &str {
        "fake"
    }
}
