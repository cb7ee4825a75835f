use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{GeneratedVideo, VideoGenError, VideoGenResult, VideoGenerator, VideoRequest};
use crate::logging::pii::Redacted;

const DEFAULT_API_URL: &str = "https://api.runware.ai/v1";

/// Settings for the Runware REST API; see `RunwareConfig::from_env`.
#[derive(Clone)]
pub struct RunwareConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub width: i32,
    pub height: i32,
    pub duration_secs: u32,
    pub fps: u32,
    pub poll_interval: Duration,
}

impl std::fmt::Debug for RunwareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunwareConfig")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("duration_secs", &self.duration_secs)
            .field("fps", &self.fps)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl RunwareConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            model: "bytedance:1@1".to_string(),
            width: 864,
            height: 480,
            duration_secs: 5,
            fps: 24,
            poll_interval: Duration::from_millis(2000),
        }
    }

    /// `RUNWARE_API_KEY` is required; everything else has a default.
    pub fn from_env() -> VideoGenResult<Self> {
        let api_key = std::env::var("RUNWARE_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| VideoGenError::Config("RUNWARE_API_KEY is not set".into()))?;

        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var("RUNWARE_API_URL") {
            config.api_url = url;
        }
        if let Ok(model) = std::env::var("RUNWARE_MODEL") {
            config.model = model;
        }
        config.width = parse_var("RUNWARE_WIDTH", config.width)?;
        config.height = parse_var("RUNWARE_HEIGHT", config.height)?;
        config.duration_secs = parse_var("RUNWARE_DURATION_SECS", config.duration_secs)?;
        config.fps = parse_var("RUNWARE_FPS", config.fps)?;
        config.poll_interval = Duration::from_millis(parse_var(
            "RUNWARE_POLL_INTERVAL_MS",
            config.poll_interval.as_millis() as u64,
        )?);
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> VideoGenResult<T> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| VideoGenError::Config(format!("{name}='{raw}' is not valid"))),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoInferenceTask<'a> {
    task_type: &'static str,
    #[serde(rename = "taskUUID")]
    task_uuid: Uuid,
    positive_prompt: &'a str,
    model: &'a str,
    width: i32,
    height: i32,
    duration: u32,
    fps: u32,
    number_results: u32,
    include_cost: bool,
    delivery_method: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetResponseTask {
    task_type: &'static str,
    #[serde(rename = "taskUUID")]
    task_uuid: Uuid,
}

#[derive(Debug, Deserialize, Default)]
struct ApiEnvelope {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    errors: Vec<ApiErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorItem {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResultItem {
    #[serde(default)]
    status: Option<String>,
    #[serde(rename = "videoURL", default)]
    video_url: Option<String>,
    #[serde(default)]
    cost: Option<f64>,
    #[serde(default)]
    seed: Option<i64>,
}

/// Outcome of one poll of the task.
#[derive(Debug, PartialEq)]
enum PollState {
    Pending,
    Done {
        video_url: String,
        status: String,
        cost: Option<f64>,
        seed: Option<i64>,
    },
}

fn parse_envelope(body: &str) -> VideoGenResult<ApiEnvelope> {
    serde_json::from_str(body).map_err(|e| VideoGenError::Parse(e.to_string()))
}

fn first_error(envelope: &ApiEnvelope) -> Option<VideoGenError> {
    envelope.errors.first().map(|e| {
        VideoGenError::Api(format!(
            "{}: {}",
            e.code.as_deref().unwrap_or("unknown"),
            e.message.as_deref().unwrap_or("no message")
        ))
    })
}

/// Interpret a `getResponse` envelope for one task.
fn interpret_poll(envelope: &ApiEnvelope) -> VideoGenResult<PollState> {
    if let Some(err) = first_error(envelope) {
        return Err(err);
    }

    let Some(raw) = envelope.data.first() else {
        return Ok(PollState::Pending);
    };
    let item: VideoResultItem =
        serde_json::from_value(raw.clone()).map_err(|e| VideoGenError::Parse(e.to_string()))?;

    match (item.video_url, item.status.as_deref()) {
        (Some(url), status) if !url.is_empty() => Ok(PollState::Done {
            video_url: url,
            status: status.unwrap_or("success").to_string(),
            cost: item.cost,
            seed: item.seed,
        }),
        (_, Some("error")) | (_, Some("failed")) => {
            Err(VideoGenError::Api("task reported failure".into()))
        }
        (_, Some("success")) => Err(VideoGenError::NoResult),
        _ => Ok(PollState::Pending),
    }
}

/// Runware REST client: submits an async `videoInference` task, then
/// polls `getResponse` until a video URL is ready.
pub struct RunwareClient {
    http: reqwest::Client,
    config: RunwareConfig,
}

impl RunwareClient {
    pub fn new(config: RunwareConfig) -> VideoGenResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| VideoGenError::Config(e.to_string()))?;
        Ok(Self { http, config })
    }

    async fn post_tasks<T: Serialize + ?Sized>(&self, tasks: &T) -> VideoGenResult<ApiEnvelope> {
        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(tasks)
            .send()
            .await
            .map_err(|e| VideoGenError::Api(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VideoGenError::Api(e.to_string()))?;

        if !status.is_success() {
            // Error bodies usually carry a structured reason.
            if let Some(err) = parse_envelope(&body).ok().as_ref().and_then(first_error) {
                return Err(err);
            }
            return Err(VideoGenError::Api(format!("HTTP {status}")));
        }

        parse_envelope(&body)
    }

    async fn generate_inner(&self, request: &VideoRequest) -> VideoGenResult<GeneratedVideo> {
        let start = Instant::now();
        let task = VideoInferenceTask {
            task_type: "videoInference",
            task_uuid: request.task_uuid,
            positive_prompt: &request.prompt,
            model: &self.config.model,
            width: self.config.width,
            height: self.config.height,
            duration: self.config.duration_secs,
            fps: self.config.fps,
            number_results: 1,
            include_cost: true,
            delivery_method: "async",
        };

        let accepted = self.post_tasks(&[task]).await?;
        if let Some(err) = first_error(&accepted) {
            return Err(err);
        }
        debug!(task_uuid = %request.task_uuid, "video task accepted");

        let poll = [GetResponseTask {
            task_type: "getResponse",
            task_uuid: request.task_uuid,
        }];

        loop {
            tokio::time::sleep(self.config.poll_interval).await;

            let envelope = self.post_tasks(&poll).await?;
            match interpret_poll(&envelope)? {
                PollState::Pending => {
                    debug!(
                        task_uuid = %request.task_uuid,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "video task still processing"
                    );
                }
                PollState::Done {
                    video_url,
                    status,
                    cost,
                    seed,
                } => {
                    let latency_ms = start.elapsed().as_millis() as u64;
                    info!(task_uuid = %request.task_uuid, latency_ms, "video generated");
                    return Ok(GeneratedVideo {
                        task_uuid: request.task_uuid,
                        video_url,
                        status,
                        model: self.config.model.clone(),
                        width: self.config.width,
                        height: self.config.height,
                        cost,
                        seed,
                        latency_ms,
                    });
                }
            }
        }
    }
}

#[async_trait]
impl VideoGenerator for RunwareClient {
    async fn generate(&self, request: VideoRequest) -> VideoGenResult<GeneratedVideo> {
        let result = tokio::time::timeout(request.timeout, self.generate_inner(&request))
            .await
            .map_err(|_| VideoGenError::Timeout(request.timeout))?;

        if let Err(e) = &result {
            warn!(
                task_uuid = %request.task_uuid,
                error = %Redacted(&e.to_string()),
                "video generation failed"
            );
        }
        result
    }

    fn name(&self) -> &str {
        "runware"
    }
}
