use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::{debug, info};

use super::{AdvanceOutcome, GameFlowService};
use crate::domain::rules::{can_advance, round_is_due};
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::games::Game;
use crate::repos::rounds::Round;
use crate::repos::{games, rounds};
use crate::utils::words::random_topic;

impl GameFlowService {
    /// Swap `current_round` forward and insert the next round.
    /// Returns `None` when the swap lost.
    async fn open_next_round<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        game: &Game,
    ) -> Result<Option<Round>, AppError> {
        if !games::advance_current_round(conn, game.id, game.current_round).await? {
            return Ok(None);
        }
        let round =
            rounds::create_round(conn, game.id, game.current_round + 1, random_topic()).await?;
        Ok(Some(round))
    }

    /// Host-triggered advance. Errors instead of silently doing nothing.
    pub async fn advance_round<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        game_id: i64,
    ) -> Result<Round, AppError> {
        let game = games::require_game(conn, game_id).await?;
        game.ensure_active()?;

        if !can_advance(game.current_round, self.config.max_rounds) {
            return Err(DomainError::conflict(
                ConflictKind::MaxRoundsReached,
                format!("Game {game_id} already played {} rounds", self.config.max_rounds),
            )
            .into());
        }

        let round = self.open_next_round(conn, &game).await?.ok_or_else(|| {
            DomainError::conflict(
                ConflictKind::RoundAdvance,
                format!("Round {} of game {game_id} was already advanced", game.current_round),
            )
        })?;

        info!(game_id, round = round.round_number, topic = %round.topic, "Round advanced");
        Ok(round)
    }

    /// Advance when the latest round has run its full duration.
    ///
    /// Idempotent: at most one caller wins the swap for a given round, all
    /// others (and calls before the deadline, after the last round, or
    /// after the game ended) get `NotDue`.
    pub async fn advance_if_due<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        game_id: i64,
        now: OffsetDateTime,
    ) -> Result<AdvanceOutcome, AppError> {
        let game = games::require_game(conn, game_id).await?;
        if !game.is_active || !can_advance(game.current_round, self.config.max_rounds) {
            return Ok(AdvanceOutcome::NotDue);
        }

        let Some(latest) = rounds::find_latest(conn, game_id).await? else {
            return Ok(AdvanceOutcome::NotDue);
        };
        if !round_is_due(latest.created_at, now, self.config.round_duration) {
            return Ok(AdvanceOutcome::NotDue);
        }

        match self.open_next_round(conn, &game).await? {
            Some(round) => {
                info!(
                    game_id,
                    round = round.round_number,
                    topic = %round.topic,
                    "Round auto-advanced"
                );
                Ok(AdvanceOutcome::Advanced(round))
            }
            None => {
                debug!(game_id, round = game.current_round, "Auto-advance lost the swap");
                Ok(AdvanceOutcome::NotDue)
            }
        }
    }

    /// Mark the game ended. Unknown ids are `NotFound` and change nothing.
    pub async fn end_game<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        game_id: i64,
    ) -> Result<(), AppError> {
        if !games::end_game(conn, game_id).await? {
            return Err(
                DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
                    .into(),
            );
        }
        info!(game_id, "Game ended");
        Ok(())
    }
}
