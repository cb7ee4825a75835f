//! Game repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::games_sea as games_adapter;
use crate::entities::games;
use crate::errors::domain::DomainError;

/// Game domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    /// 0 until the first round exists, then the latest round number.
    pub current_round: i16,
    pub lock_version: i32,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
    pub ended_at: Option<time::OffsetDateTime>,
}

impl Game {
    /// Fail with `GameInactive` once the game has ended.
    pub fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_active {
            Ok(())
        } else {
            Err(DomainError::GameInactive(self.id))
        }
    }
}

impl From<games::Model> for Game {
    fn from(model: games::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            is_active: model.is_active,
            current_round: model.current_round,
            lock_version: model.lock_version,
            created_at: model.created_at,
            updated_at: model.updated_at,
            ended_at: model.ended_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<Game>, DomainError> {
    let game = games_adapter::find_by_id(conn, game_id).await?;
    Ok(game.map(Game::from))
}

/// Find game by ID or return `NotFound(Game)`.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Game, DomainError> {
    let game = games_adapter::require_game(conn, game_id).await?;
    Ok(Game::from(game))
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: impl Into<String>,
) -> Result<Game, DomainError> {
    let game = games_adapter::create_game(conn, games_adapter::GameCreate::new(name)).await?;
    Ok(Game::from(game))
}

/// Serialize writers on this game for the rest of the transaction.
pub async fn lock_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Game, DomainError> {
    let game = games_adapter::lock_game(conn, game_id).await?;
    Ok(Game::from(game))
}

/// Move `current_round` from `expected_round` to the next number.
/// `Ok(false)` means another caller already moved it or the game ended.
pub async fn advance_current_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    expected_round: i16,
) -> Result<bool, DomainError> {
    let swap = games_adapter::RoundSwap::advance_from(game_id, expected_round);
    let rows = games_adapter::swap_current_round(conn, swap).await?;
    Ok(rows == 1)
}

/// Returns `true` when a row was updated.
pub async fn end_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<bool, DomainError> {
    Ok(games_adapter::end_game(conn, game_id).await? > 0)
}

pub async fn list_active_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<i64>, DomainError> {
    Ok(games_adapter::list_active_ids(conn).await?)
}
