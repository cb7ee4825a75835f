//! SeaORM adapter for the games table - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::games;
use crate::infra::db_errors::GAME_NOT_FOUND_PREFIX;

pub mod dto;

pub use dto::{GameCreate, RoundSwap};

// Adapter functions return DbErr; repos layer maps to DomainError via map_db_err.

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id).one(conn).await
}

/// Find game by ID or fail with the game-not-found marker error.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<games::Model, sea_orm::DbErr> {
    find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::Custom(format!("{GAME_NOT_FOUND_PREFIX}{game_id}")))
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let game = games::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        is_active: Set(true),
        current_round: Set(0),
        lock_version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
        ended_at: Set(None),
    };

    game.insert(conn).await
}

/// Take the game row for the rest of the transaction by bumping
/// `lock_version`. Concurrent writers on the same game queue behind it.
pub async fn lock_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<games::Model, sea_orm::DbErr> {
    let result = games::Entity::update_many()
        .col_expr(
            games::Column::LockVersion,
            Expr::col(games::Column::LockVersion).add(1),
        )
        .filter(games::Column::Id.eq(game_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(sea_orm::DbErr::Custom(format!(
            "{GAME_NOT_FOUND_PREFIX}{game_id}"
        )));
    }

    require_game(conn, game_id).await
}

/// Apply a [`RoundSwap`]. Returns the number of rows changed: 1 when this
/// caller won, 0 when the round had already moved or the game ended.
pub async fn swap_current_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    swap: RoundSwap,
) -> Result<u64, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let result = games::Entity::update_many()
        .col_expr(games::Column::CurrentRound, Expr::value(swap.next_round))
        .col_expr(games::Column::UpdatedAt, Expr::value(now))
        .col_expr(
            games::Column::LockVersion,
            Expr::col(games::Column::LockVersion).add(1),
        )
        .filter(games::Column::Id.eq(swap.game_id))
        .filter(games::Column::CurrentRound.eq(swap.expected_round))
        .filter(games::Column::IsActive.eq(true))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

/// Mark the game ended. Returns rows affected (0 when the id is unknown).
pub async fn end_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let result = games::Entity::update_many()
        .col_expr(games::Column::IsActive, Expr::value(false))
        .col_expr(games::Column::EndedAt, Expr::value(Some(now)))
        .col_expr(games::Column::UpdatedAt, Expr::value(now))
        .col_expr(
            games::Column::LockVersion,
            Expr::col(games::Column::LockVersion).add(1),
        )
        .filter(games::Column::Id.eq(game_id))
        .exec(conn)
        .await?;

    Ok(result.rows_affected)
}

/// Ids of active games, oldest first.
pub async fn list_active_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<i64>, sea_orm::DbErr> {
    games::Entity::find()
        .select_only()
        .column(games::Column::Id)
        .filter(games::Column::IsActive.eq(true))
        .order_by_asc(games::Column::Id)
        .into_tuple::<i64>()
        .all(conn)
        .await
}
