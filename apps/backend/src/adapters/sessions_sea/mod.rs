//! SeaORM adapter for sessions (players and voters of a game).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entities::sessions;

pub mod dto;

pub use dto::SessionCreate;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Option<sessions::Model>, sea_orm::DbErr> {
    sessions::Entity::find_by_id(session_id).one(conn).await
}

/// Player slots already taken in a game.
pub async fn player_slots<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<i16>, sea_orm::DbErr> {
    sessions::Entity::find()
        .select_only()
        .column(sessions::Column::PlayerSlot)
        .filter(sessions::Column::GameId.eq(game_id))
        .filter(sessions::Column::IsPlayer.eq(true))
        .into_tuple::<Option<i16>>()
        .all(conn)
        .await
        .map(|slots| slots.into_iter().flatten().collect())
}

pub async fn find_all_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<sessions::Model>, sea_orm::DbErr> {
    sessions::Entity::find()
        .filter(sessions::Column::GameId.eq(game_id))
        .order_by_asc(sessions::Column::Id)
        .all(conn)
        .await
}

pub async fn create_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionCreate,
) -> Result<sessions::Model, sea_orm::DbErr> {
    let session = sessions::ActiveModel {
        id: sea_orm::NotSet,
        game_id: Set(dto.game_id),
        display_name: Set(dto.display_name),
        is_player: Set(dto.player_slot.is_some()),
        player_slot: Set(dto.player_slot),
        avatar: Set(dto.avatar),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };

    session.insert(conn).await
}
