use sea_orm::ConnectionTrait;
use tracing::info;

use super::GameFlowService;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::votes::Vote;
use crate::repos::{games, sessions, submissions, votes};

impl GameFlowService {
    /// Record one vote. A session votes at most once per round; the
    /// unique index on (session_id, round_id) backs the early check.
    pub async fn cast_vote<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        session_id: i64,
        submission_id: i64,
    ) -> Result<Vote, AppError> {
        let session = sessions::require_session(conn, session_id).await?;
        let game = games::require_game(conn, session.game_id).await?;
        game.ensure_active()?;

        let submission = submissions::require_submission(conn, submission_id).await?;
        if submission.game_id != game.id {
            return Err(DomainError::not_found(
                NotFoundKind::Submission,
                format!("Submission {submission_id} not found in game {}", game.id),
            )
            .into());
        }

        if votes::find_by_session_and_round(conn, session.id, submission.round_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(
                ConflictKind::AlreadyVoted,
                "Session already voted in this round",
            )
            .into());
        }

        let vote = votes::create_vote(conn, session.id, submission.id, submission.round_id).await?;

        info!(
            game_id = game.id,
            round_id = vote.round_id,
            session_id = vote.session_id,
            submission_id = vote.submission_id,
            "Vote cast"
        );
        Ok(vote)
    }
}
