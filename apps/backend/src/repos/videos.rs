//! Video record repository functions.

use sea_orm::ConnectionTrait;

use crate::adapters::videos_sea as videos_adapter;
use crate::entities::videos;
use crate::errors::domain::{DomainError, NotFoundKind};

pub use videos_adapter::VideoUpsert;

#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: i64,
    pub task_uuid: String,
    pub video_url: String,
    pub status: String,
    pub prompt: String,
    pub model: String,
    pub width: f64,
    pub height: f64,
    pub cost: Option<f64>,
    pub seed: Option<f64>,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

impl From<videos::Model> for Video {
    fn from(model: videos::Model) -> Self {
        Self {
            id: model.id,
            task_uuid: model.task_uuid,
            video_url: model.video_url,
            status: model.status,
            prompt: model.prompt,
            model: model.model,
            width: model.width,
            height: model.height,
            cost: model.cost,
            seed: model.seed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub async fn upsert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: VideoUpsert,
) -> Result<Video, DomainError> {
    Ok(Video::from(videos_adapter::upsert(conn, dto).await?))
}

pub async fn require_by_task_uuid<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    task_uuid: &str,
) -> Result<Video, DomainError> {
    videos_adapter::find_by_task_uuid(conn, task_uuid)
        .await?
        .map(Video::from)
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Video, format!("Video {task_uuid} not found"))
        })
}

/// One page of videos (newest first) and the total count.
pub async fn list_page<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    limit: u64,
    offset: u64,
) -> Result<(Vec<Video>, u64), DomainError> {
    let rows = videos_adapter::list(conn, limit, offset).await?;
    let total = videos_adapter::count(conn).await?;
    Ok((rows.into_iter().map(Video::from).collect(), total))
}
