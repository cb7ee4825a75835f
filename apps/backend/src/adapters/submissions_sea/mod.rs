//! SeaORM adapter for prompt submissions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::submissions;

pub mod dto;

pub use dto::SubmissionCreate;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    submission_id: i64,
) -> Result<Option<submissions::Model>, sea_orm::DbErr> {
    submissions::Entity::find_by_id(submission_id).one(conn).await
}

pub async fn find_by_session_and_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    round_id: i64,
) -> Result<Option<submissions::Model>, sea_orm::DbErr> {
    submissions::Entity::find()
        .filter(submissions::Column::SessionId.eq(session_id))
        .filter(submissions::Column::RoundId.eq(round_id))
        .one(conn)
        .await
}

pub async fn find_all_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<submissions::Model>, sea_orm::DbErr> {
    submissions::Entity::find()
        .filter(submissions::Column::RoundId.eq(round_id))
        .order_by_asc(submissions::Column::Id)
        .all(conn)
        .await
}

pub async fn find_all_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<submissions::Model>, sea_orm::DbErr> {
    submissions::Entity::find()
        .filter(submissions::Column::GameId.eq(game_id))
        .order_by_asc(submissions::Column::Id)
        .all(conn)
        .await
}

pub async fn create_submission<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SubmissionCreate,
) -> Result<submissions::Model, sea_orm::DbErr> {
    let submission = submissions::ActiveModel {
        id: sea_orm::NotSet,
        session_id: Set(dto.session_id),
        game_id: Set(dto.game_id),
        round_id: Set(dto.round_id),
        content: Set(dto.content),
        result_url: Set(dto.result_url),
        video_task_uuid: Set(dto.video_task_uuid),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    submission.insert(conn).await
}
