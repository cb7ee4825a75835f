use sea_orm::ConnectionTrait;
use tracing::info;

use super::{GameCreated, GameFlowService};
use crate::domain::rules::{next_player_slot, normalize_display_name, role_for_next_join};
use crate::domain::Role;
use crate::error::AppError;
use crate::repos::sessions::Session;
use crate::repos::{games, rounds, sessions};
use crate::utils::words::{random_game_name, random_topic};

impl GameFlowService {
    /// Create a game with a generated name and open round 1.
    pub async fn create_game<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<GameCreated, AppError> {
        let game = games::create_game(conn, random_game_name()).await?;
        let round = rounds::create_round(conn, game.id, 1, random_topic()).await?;

        if !games::advance_current_round(conn, game.id, 0).await? {
            return Err(AppError::internal("new game changed before round 1 was opened"));
        }
        let game = games::require_game(conn, game.id).await?;

        info!(game_id = game.id, name = %game.name, topic = %round.topic, "Game created");
        Ok(GameCreated { game, round })
    }

    /// Add a participant. The first two sessions become players, later
    /// ones voters. Role assignment runs with the game row locked.
    pub async fn join_game<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        game_id: i64,
        display_name: &str,
        avatar: Option<&str>,
    ) -> Result<Session, AppError> {
        let display_name = normalize_display_name(display_name)?;
        let avatar = avatar.map(str::trim).unwrap_or_default().to_string();

        games::lock_game(conn, game_id).await?;

        let taken = sessions::player_slots(conn, game_id).await?;
        let slot = match role_for_next_join(taken.len()) {
            Role::Player => next_player_slot(&taken),
            Role::Voter => None,
        };

        let session = sessions::create_session(conn, game_id, display_name, avatar, slot).await?;

        info!(
            game_id,
            session_id = session.id,
            role = session.role.as_str(),
            player_slot = ?session.player_slot,
            "Session joined"
        );
        Ok(session)
    }
}
