//! SeaORM adapter for rounds repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::game_rounds;

pub mod dto;

pub use dto::RoundCreate;

/// Find a round by ID
pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Option<game_rounds::Model>, sea_orm::DbErr> {
    game_rounds::Entity::find_by_id(round_id).one(conn).await
}

/// Highest-numbered round of a game
pub async fn find_latest<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<game_rounds::Model>, sea_orm::DbErr> {
    game_rounds::Entity::find()
        .filter(game_rounds::Column::GameId.eq(game_id))
        .order_by_desc(game_rounds::Column::RoundNumber)
        .one(conn)
        .await
}

/// Find all rounds for a game (ordered by round_number)
pub async fn find_all_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<game_rounds::Model>, sea_orm::DbErr> {
    game_rounds::Entity::find()
        .filter(game_rounds::Column::GameId.eq(game_id))
        .order_by_asc(game_rounds::Column::RoundNumber)
        .all(conn)
        .await
}

pub async fn count_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    game_rounds::Entity::find()
        .filter(game_rounds::Column::GameId.eq(game_id))
        .count(conn)
        .await
}

/// Create a new round
pub async fn create_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoundCreate,
) -> Result<game_rounds::Model, sea_orm::DbErr> {
    let round = game_rounds::ActiveModel {
        id: sea_orm::NotSet,
        game_id: Set(dto.game_id),
        round_number: Set(dto.round_number),
        content: Set(dto.content),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    round.insert(conn).await
}
