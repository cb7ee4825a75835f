//! SeaORM adapter for votes.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Set,
};

use crate::entities::votes;

pub mod dto;

pub use dto::VoteCreate;

pub async fn find_by_session_and_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    round_id: i64,
) -> Result<Option<votes::Model>, sea_orm::DbErr> {
    votes::Entity::find()
        .filter(votes::Column::SessionId.eq(session_id))
        .filter(votes::Column::RoundId.eq(round_id))
        .one(conn)
        .await
}

/// Submission id of every vote cast in the given rounds, one entry per vote.
pub async fn voted_submission_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_ids: &[i64],
) -> Result<Vec<i64>, sea_orm::DbErr> {
    if round_ids.is_empty() {
        return Ok(Vec::new());
    }
    votes::Entity::find()
        .select_only()
        .column(votes::Column::SubmissionId)
        .filter(votes::Column::RoundId.is_in(round_ids.iter().copied()))
        .into_tuple::<i64>()
        .all(conn)
        .await
}

pub async fn create_vote<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: VoteCreate,
) -> Result<votes::Model, sea_orm::DbErr> {
    let vote = votes::ActiveModel {
        id: sea_orm::NotSet,
        session_id: Set(dto.session_id),
        submission_id: Set(dto.submission_id),
        round_id: Set(dto.round_id),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    vote.insert(conn).await
}
