//! `/api/videos`: records reported by the generation pipeline.

use actix_web::{web, HttpRequest, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{Validate, ValidatedJson};
use crate::repos::videos::Video;
use crate::services::videos::{page_params, VideoPage, VideoReport, VideoService};
use crate::state::app_state::AppState;

/// Every field is optional here so that `VideoReport::field_errors` can
/// name all missing ones at once. A field of the wrong JSON type fails
/// deserialization instead.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VideoReportRequest {
    #[serde(rename = "taskUUID")]
    pub task_uuid: Option<String>,
    #[serde(rename = "videoURL")]
    pub video_url: Option<String>,
    pub status: Option<String>,
    pub prompt: Option<String>,
    pub model: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub cost: Option<f64>,
    pub seed: Option<f64>,
}

impl Validate for VideoReportRequest {}

impl From<VideoReportRequest> for VideoReport {
    fn from(r: VideoReportRequest) -> Self {
        Self {
            task_uuid: r.task_uuid,
            video_url: r.video_url,
            status: r.status,
            prompt: r.prompt,
            model: r.model,
            width: r.width,
            height: r.height,
            cost: r.cost,
            seed: r.seed,
        }
    }
}

/// Whole values go back out as JSON integers (`864`, not `864.0`).
fn json_number(value: f64) -> serde_json::Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        serde_json::Value::from(value as i64)
    } else {
        serde_json::Value::from(value)
    }
}

#[derive(Debug, Serialize)]
pub struct RecordVideoResponse {
    pub success: bool,
    #[serde(rename = "taskUUID")]
    pub task_uuid: String,
    pub message: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct VideoDto {
    #[serde(rename = "taskUUID")]
    pub task_uuid: String,
    #[serde(rename = "videoURL")]
    pub video_url: String,
    pub status: String,
    pub prompt: String,
    pub model: String,
    pub width: serde_json::Value,
    pub height: serde_json::Value,
    pub cost: Option<f64>,
    pub seed: Option<serde_json::Value>,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Video> for VideoDto {
    fn from(v: Video) -> Self {
        Self {
            task_uuid: v.task_uuid,
            video_url: v.video_url,
            status: v.status,
            prompt: v.prompt,
            model: v.model,
            width: json_number(v.width),
            height: json_number(v.height),
            cost: v.cost,
            seed: v.seed.map(json_number),
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VideoListResponse {
    pub videos: Vec<VideoDto>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

impl From<VideoPage> for VideoListResponse {
    fn from(p: VideoPage) -> Self {
        Self {
            videos: p.videos.into_iter().map(Into::into).collect(),
            total: p.total,
            limit: p.limit,
            offset: p.offset,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VideoQuery {
    #[serde(rename = "taskUUID")]
    pub task_uuid: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// POST /api/videos
async fn record_video(
    http_req: HttpRequest,
    body: ValidatedJson<VideoReportRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<RecordVideoResponse>, AppError> {
    let report = VideoReport::from(body.into_inner());

    let video = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { VideoService.record(txn, report).await })
    })
    .await?;

    Ok(web::Json(RecordVideoResponse {
        success: true,
        task_uuid: video.task_uuid,
        message: "Video data received successfully",
        timestamp: OffsetDateTime::now_utc(),
    }))
}

/// GET /api/videos?taskUUID= returns one record; without it, a page.
async fn get_videos(
    http_req: HttpRequest,
    query: web::Query<VideoQuery>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<serde_json::Value>, AppError> {
    let VideoQuery {
        task_uuid,
        limit,
        offset,
    } = query.into_inner();

    if let Some(task_uuid) = task_uuid.filter(|s| !s.trim().is_empty()) {
        let video = with_txn(Some(&http_req), &app_state, move |txn| {
            Box::pin(async move { VideoService.get(txn, &task_uuid).await })
        })
        .await?;
        return Ok(web::Json(to_json(VideoDto::from(video))?));
    }

    let (limit, offset) = page_params(limit, offset)?;
    let page = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { VideoService.list(txn, limit, offset).await })
    })
    .await?;

    Ok(web::Json(to_json(VideoListResponse::from(page))?))
}

fn to_json<T: Serialize>(value: T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(value).map_err(|e| AppError::internal(format!("serialize response: {e}")))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(record_video))
        .route("", web::get().to(get_videos));
}
