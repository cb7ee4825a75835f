//! SeaORM adapter for generated video records.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::videos;

pub mod dto;

pub use dto::VideoUpsert;

pub async fn find_by_task_uuid<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    task_uuid: &str,
) -> Result<Option<videos::Model>, sea_orm::DbErr> {
    videos::Entity::find()
        .filter(videos::Column::TaskUuid.eq(task_uuid))
        .one(conn)
        .await
}

/// Insert or, when `task_uuid` already exists, overwrite the reported fields.
pub async fn upsert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: VideoUpsert,
) -> Result<videos::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let task_uuid = dto.task_uuid.clone();
    let video = videos::ActiveModel {
        id: sea_orm::NotSet,
        task_uuid: Set(dto.task_uuid),
        video_url: Set(dto.video_url),
        status: Set(dto.status),
        prompt: Set(dto.prompt),
        model: Set(dto.model),
        width: Set(dto.width),
        height: Set(dto.height),
        cost: Set(dto.cost),
        seed: Set(dto.seed),
        created_at: Set(now),
        updated_at: Set(now),
    };

    videos::Entity::insert(video)
        .on_conflict(
            OnConflict::column(videos::Column::TaskUuid)
                .update_columns([
                    videos::Column::VideoUrl,
                    videos::Column::Status,
                    videos::Column::Prompt,
                    videos::Column::Model,
                    videos::Column::Width,
                    videos::Column::Height,
                    videos::Column::Cost,
                    videos::Column::Seed,
                    videos::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

    find_by_task_uuid(conn, &task_uuid)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("video {task_uuid}")))
}

/// Newest first.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    limit: u64,
    offset: u64,
) -> Result<Vec<videos::Model>, sea_orm::DbErr> {
    videos::Entity::find()
        .order_by_desc(videos::Column::CreatedAt)
        .order_by_desc(videos::Column::Id)
        .limit(limit)
        .offset(offset)
        .all(conn)
        .await
}

pub async fn count<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, sea_orm::DbErr> {
    videos::Entity::find().count(conn).await
}
