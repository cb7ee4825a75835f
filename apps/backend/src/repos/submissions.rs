//! Submission repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::submissions_sea as submissions_adapter;
use crate::entities::submissions;
use crate::errors::domain::{DomainError, NotFoundKind};

/// A player's prompt for one round plus the generated video reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: i64,
    pub session_id: i64,
    pub game_id: i64,
    pub round_id: i64,
    pub content: String,
    pub result_url: Option<String>,
    pub video_task_uuid: Option<String>,
    pub created_at: time::OffsetDateTime,
}

impl From<submissions::Model> for Submission {
    fn from(model: submissions::Model) -> Self {
        Self {
            id: model.id,
            session_id: model.session_id,
            game_id: model.game_id,
            round_id: model.round_id,
            content: model.content,
            result_url: model.result_url,
            video_task_uuid: model.video_task_uuid,
            created_at: model.created_at,
        }
    }
}

/// Fields of a submission about to be recorded.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub session_id: i64,
    pub game_id: i64,
    pub round_id: i64,
    pub content: String,
    pub result_url: Option<String>,
    pub video_task_uuid: Option<String>,
}

pub async fn require_submission<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    submission_id: i64,
) -> Result<Submission, DomainError> {
    submissions_adapter::find_by_id(conn, submission_id)
        .await?
        .map(Submission::from)
        .ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Submission,
                format!("Submission {submission_id} not found"),
            )
        })
}

pub async fn find_by_session_and_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    round_id: i64,
) -> Result<Option<Submission>, DomainError> {
    let found =
        submissions_adapter::find_by_session_and_round(conn, session_id, round_id).await?;
    Ok(found.map(Submission::from))
}

pub async fn find_all_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<Submission>, DomainError> {
    let rows = submissions_adapter::find_all_by_round(conn, round_id).await?;
    Ok(rows.into_iter().map(Submission::from).collect())
}

pub async fn find_all_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<Submission>, DomainError> {
    let rows = submissions_adapter::find_all_by_game(conn, game_id).await?;
    Ok(rows.into_iter().map(Submission::from).collect())
}

pub async fn create_submission<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new: NewSubmission,
) -> Result<Submission, DomainError> {
    let dto = submissions_adapter::SubmissionCreate {
        session_id: new.session_id,
        game_id: new.game_id,
        round_id: new.round_id,
        content: new.content,
        result_url: new.result_url,
        video_task_uuid: new.video_task_uuid,
    };
    let row = submissions_adapter::create_submission(conn, dto).await?;
    Ok(Submission::from(row))
}
