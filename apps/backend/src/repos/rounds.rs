//! Round repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::rounds_sea as rounds_adapter;
use crate::entities::game_rounds;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Round domain model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub id: i64,
    pub game_id: i64,
    pub round_number: i16,
    pub topic: String,
    pub created_at: time::OffsetDateTime,
}

impl From<game_rounds::Model> for Round {
    fn from(model: game_rounds::Model) -> Self {
        Self {
            id: model.id,
            game_id: model.game_id,
            round_number: model.round_number,
            topic: model.content,
            created_at: model.created_at,
        }
    }
}

pub async fn find_latest<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<Round>, DomainError> {
    let round = rounds_adapter::find_latest(conn, game_id).await?;
    Ok(round.map(Round::from))
}

/// Latest round or `NotFound(Round)`.
pub async fn require_latest<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Round, DomainError> {
    find_latest(conn, game_id).await?.ok_or_else(|| {
        DomainError::not_found(
            NotFoundKind::Round,
            format!("Game {game_id} has no rounds"),
        )
    })
}

pub async fn find_all_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<Round>, DomainError> {
    let rounds = rounds_adapter::find_all_by_game(conn, game_id).await?;
    Ok(rounds.into_iter().map(Round::from).collect())
}

pub async fn count_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DomainError> {
    Ok(rounds_adapter::count_by_game(conn, game_id).await?)
}

pub async fn create_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    round_number: i16,
    topic: impl Into<String>,
) -> Result<Round, DomainError> {
    let dto = rounds_adapter::RoundCreate {
        game_id,
        round_number,
        content: topic.into(),
    };
    let round = rounds_adapter::create_round(conn, dto).await?;
    Ok(Round::from(round))
}
