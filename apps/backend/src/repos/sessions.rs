//! Session repository functions for domain layer.

use sea_orm::ConnectionTrait;

use crate::adapters::sessions_sea as sessions_adapter;
use crate::domain::Role;
use crate::entities::sessions;
use crate::errors::domain::DomainError;

/// A participant of one game: a player (slot 1 or 2) or a voter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: i64,
    pub game_id: i64,
    pub display_name: String,
    pub role: Role,
    pub player_slot: Option<i16>,
    pub avatar: String,
    pub created_at: time::OffsetDateTime,
}

impl Session {
    pub fn is_player(&self) -> bool {
        self.role == Role::Player
    }
}

impl From<sessions::Model> for Session {
    fn from(model: sessions::Model) -> Self {
        Self {
            id: model.id,
            game_id: model.game_id,
            display_name: model.display_name,
            role: if model.is_player {
                Role::Player
            } else {
                Role::Voter
            },
            player_slot: model.player_slot,
            avatar: model.avatar,
            created_at: model.created_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Option<Session>, DomainError> {
    let session = sessions_adapter::find_by_id(conn, session_id).await?;
    Ok(session.map(Session::from))
}

pub async fn require_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
) -> Result<Session, DomainError> {
    find_by_id(conn, session_id)
        .await?
        .ok_or_else(|| DomainError::session_not_found(session_id))
}

pub async fn player_slots<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<i16>, DomainError> {
    Ok(sessions_adapter::player_slots(conn, game_id).await?)
}

pub async fn find_all_by_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<Session>, DomainError> {
    let sessions = sessions_adapter::find_all_by_game(conn, game_id).await?;
    Ok(sessions.into_iter().map(Session::from).collect())
}

pub async fn create_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    display_name: String,
    avatar: String,
    player_slot: Option<i16>,
) -> Result<Session, DomainError> {
    let dto = sessions_adapter::SessionCreate {
        game_id,
        display_name,
        avatar,
        player_slot,
    };
    let session = sessions_adapter::create_session(conn, dto).await?;
    Ok(Session::from(session))
}
