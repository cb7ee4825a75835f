//! Video records reported by the generation pipeline.

use sea_orm::ConnectionTrait;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::videos::{self, Video, VideoUpsert};

pub const DEFAULT_PAGE_LIMIT: u64 = 10;
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Incoming report of a generated video, before validation. `None`
/// means the field was absent from the body.
#[derive(Debug, Clone, Default)]
pub struct VideoReport {
    pub task_uuid: Option<String>,
    pub video_url: Option<String>,
    pub status: Option<String>,
    pub prompt: Option<String>,
    pub model: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub cost: Option<f64>,
    pub seed: Option<f64>,
}

/// Field name (as clients send it) and what is wrong with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl VideoReport {
    /// Every failing field, in body order. Strings and numbers only have
    /// to be present; the task id must be a UUID and the URL must parse.
    pub fn field_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &'static str, message: &'static str| {
            if !ok {
                errors.push(FieldError { field, message });
            }
        };

        check(
            self.task_uuid
                .as_deref()
                .is_some_and(|raw| Uuid::parse_str(raw.trim()).is_ok()),
            "taskUUID",
            "must be a UUID",
        );
        check(
            self.video_url
                .as_deref()
                .is_some_and(|raw| reqwest::Url::parse(raw.trim()).is_ok()),
            "videoURL",
            "must be a URL",
        );
        check(self.status.is_some(), "status", "is required");
        check(self.prompt.is_some(), "prompt", "is required");
        check(self.model.is_some(), "model", "is required");
        check(self.width.is_some(), "width", "is required");
        check(self.height.is_some(), "height", "is required");
        errors
    }

    /// Only called once `field_errors` came back empty.
    fn into_upsert(self) -> VideoUpsert {
        VideoUpsert {
            task_uuid: self.task_uuid.unwrap_or_default().trim().to_ascii_lowercase(),
            video_url: self.video_url.unwrap_or_default().trim().to_string(),
            status: self.status.unwrap_or_default(),
            prompt: self.prompt.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
            width: self.width.unwrap_or_default(),
            height: self.height.unwrap_or_default(),
            cost: self.cost,
            seed: self.seed,
        }
    }
}

fn validation_error(errors: &[FieldError]) -> AppError {
    let detail = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");
    AppError::invalid(ErrorCode::ValidationError, detail)
}

/// Clamp-free page parameters: out-of-range values are rejected.
pub fn page_params(limit: Option<i64>, offset: Option<i64>) -> Result<(u64, u64), AppError> {
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT as i64);
    let offset = offset.unwrap_or(0);
    if !(1..=MAX_PAGE_LIMIT as i64).contains(&limit) {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            format!("limit: must be between 1 and {MAX_PAGE_LIMIT}"),
        ));
    }
    if offset < 0 {
        return Err(AppError::invalid(
            ErrorCode::ValidationError,
            "offset: must be zero or greater",
        ));
    }
    Ok((limit as u64, offset as u64))
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoPage {
    pub videos: Vec<Video>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VideoService;

impl VideoService {
    /// Validate and upsert by task UUID; a repeated report updates the row.
    pub async fn record<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        report: VideoReport,
    ) -> Result<Video, AppError> {
        let errors = report.field_errors();
        if !errors.is_empty() {
            return Err(validation_error(&errors));
        }

        let video = videos::upsert(conn, report.into_upsert()).await?;
        info!(task_uuid = %video.task_uuid, status = %video.status, "Video recorded");
        Ok(video)
    }

    pub async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        task_uuid: &str,
    ) -> Result<Video, AppError> {
        let parsed = Uuid::parse_str(task_uuid.trim()).map_err(|_| {
            AppError::invalid(ErrorCode::ValidationError, "taskUUID: must be a UUID")
        })?;
        Ok(videos::require_by_task_uuid(conn, &parsed.to_string()).await?)
    }

    pub async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        limit: u64,
        offset: u64,
    ) -> Result<VideoPage, AppError> {
        let (videos, total) = videos::list_page(conn, limit, offset).await?;
        Ok(VideoPage {
            videos,
            total,
            limit,
            offset,
        })
    }
}
