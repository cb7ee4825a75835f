use sea_orm::ConnectionTrait;
use tracing::{info, warn};

use super::GameFlowService;
use crate::domain::rules::normalize_prompt;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::rounds::Round;
use crate::repos::submissions::{NewSubmission, Submission};
use crate::repos::videos::VideoUpsert;
use crate::repos::{games, rounds, sessions, submissions, videos};
use crate::video_gen::{GeneratedVideo, VideoGenError, VideoGenerator, VideoRequest};

/// A submission that passed every check and is waiting for its video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSubmission {
    pub session_id: i64,
    pub game_id: i64,
    pub round: Round,
    pub content: String,
}

async fn ensure_not_submitted<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    round_id: i64,
) -> Result<(), AppError> {
    if submissions::find_by_session_and_round(conn, session_id, round_id)
        .await?
        .is_some()
    {
        return Err(DomainError::conflict(
            ConflictKind::AlreadySubmitted,
            "Session already submitted a prompt for this round",
        )
        .into());
    }
    Ok(())
}

impl GameFlowService {
    /// Validate a prompt submission without writing anything.
    pub async fn prepare_submission<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        session_id: i64,
        content: &str,
    ) -> Result<PreparedSubmission, AppError> {
        let content = normalize_prompt(content)?;
        let session = sessions::require_session(conn, session_id).await?;
        let game = games::require_game(conn, session.game_id).await?;
        game.ensure_active()?;

        if !session.is_player() {
            return Err(DomainError::NotAPlayer(session.id).into());
        }

        let round = rounds::require_latest(conn, game.id).await?;
        ensure_not_submitted(conn, session.id, round.id).await?;

        Ok(PreparedSubmission {
            session_id: session.id,
            game_id: game.id,
            round,
            content,
        })
    }

    /// Call the generator, bounded by the configured timeout. No retry.
    pub async fn generate_video(
        &self,
        generator: &dyn VideoGenerator,
        prepared: &PreparedSubmission,
    ) -> Result<GeneratedVideo, AppError> {
        let timeout = self.config.generation_timeout;
        let request = VideoRequest::new(prepared.content.clone(), timeout);
        let task_uuid = request.task_uuid;

        let outcome = tokio::time::timeout(timeout, generator.generate(request))
            .await
            .unwrap_or(Err(VideoGenError::Timeout(timeout)));

        match outcome {
            Ok(video) => {
                info!(
                    game_id = prepared.game_id,
                    session_id = prepared.session_id,
                    generator = generator.name(),
                    %task_uuid,
                    latency_ms = video.latency_ms,
                    "Video generated"
                );
                Ok(video)
            }
            Err(e) => {
                warn!(
                    game_id = prepared.game_id,
                    session_id = prepared.session_id,
                    generator = generator.name(),
                    %task_uuid,
                    error = %e,
                    "Video generation failed; submission not recorded"
                );
                Err(e.into())
            }
        }
    }

    /// Persist the video and the submission. Re-checks that the game is
    /// still active, that the prepared round is still the latest one and
    /// that this session has not submitted to it meanwhile.
    pub async fn record_submission<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        prepared: PreparedSubmission,
        video: GeneratedVideo,
    ) -> Result<Submission, AppError> {
        let game = games::require_game(conn, prepared.game_id).await?;
        game.ensure_active()?;

        let latest = rounds::require_latest(conn, prepared.game_id).await?;
        if latest.id != prepared.round.id {
            warn!(
                game_id = prepared.game_id,
                session_id = prepared.session_id,
                prepared_round = prepared.round.round_number,
                latest_round = latest.round_number,
                task_uuid = %video.task_uuid,
                "Round closed during generation; submission not recorded"
            );
            return Err(DomainError::conflict(
                ConflictKind::RoundClosed,
                format!(
                    "Round {} ended before the video was ready",
                    prepared.round.round_number
                ),
            )
            .into());
        }
        ensure_not_submitted(conn, prepared.session_id, prepared.round.id).await?;

        let task_uuid = video.task_uuid.to_string();
        videos::upsert(
            conn,
            VideoUpsert {
                task_uuid: task_uuid.clone(),
                video_url: video.video_url.clone(),
                status: video.status,
                prompt: prepared.content.clone(),
                model: video.model,
                width: f64::from(video.width),
                height: f64::from(video.height),
                cost: video.cost,
                seed: video.seed.map(|s| s as f64),
            },
        )
        .await?;

        let submission = submissions::create_submission(
            conn,
            NewSubmission {
                session_id: prepared.session_id,
                game_id: prepared.game_id,
                round_id: prepared.round.id,
                content: prepared.content,
                result_url: Some(video.video_url),
                video_task_uuid: Some(task_uuid),
            },
        )
        .await?;

        info!(
            game_id = submission.game_id,
            round_id = submission.round_id,
            session_id = submission.session_id,
            submission_id = submission.id,
            "Submission recorded"
        );
        Ok(submission)
    }

    /// Prepare, generate and record on one connection.
    ///
    /// Handlers run the three phases separately so no transaction stays
    /// open while the generator works.
    pub async fn submit_prompt<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        generator: &dyn VideoGenerator,
        session_id: i64,
        content: &str,
    ) -> Result<Submission, AppError> {
        let prepared = self.prepare_submission(conn, session_id, content).await?;
        let video = self.generate_video(generator, &prepared).await?;
        self.record_submission(conn, prepared, video).await
    }
}
