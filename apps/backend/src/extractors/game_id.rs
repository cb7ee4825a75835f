use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use serde::Deserialize;

use super::GAME_COOKIE;
use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::games;
use crate::state::app_state::AppState;

/// Game id from the `gameId` query parameter, falling back to the
/// `gameId` cookie. Validates that the game exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameId(pub i64);

#[derive(Deserialize)]
struct GameIdQuery {
    #[serde(rename = "gameId")]
    game_id: Option<String>,
}

/// Parse and range-check a raw id.
pub fn parse_game_id(raw: &str) -> Result<i64, AppError> {
    let game_id = raw.trim().parse::<i64>().map_err(|_| {
        AppError::bad_request(ErrorCode::InvalidGameId, format!("Invalid game id: {raw}"))
    })?;
    if game_id <= 0 {
        return Err(AppError::bad_request(
            ErrorCode::InvalidGameId,
            format!("Game id must be positive, got: {game_id}"),
        ));
    }
    Ok(game_id)
}

fn raw_game_id(req: &HttpRequest) -> Option<String> {
    web::Query::<GameIdQuery>::from_query(req.query_string())
        .ok()
        .and_then(|q| q.into_inner().game_id)
        .filter(|s| !s.trim().is_empty())
        .or_else(|| req.cookie(GAME_COOKIE).map(|c| c.value().to_string()))
}

impl FromRequest for GameId {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let raw = raw_game_id(&req).ok_or_else(|| {
                AppError::bad_request(ErrorCode::InvalidGameId, "Missing gameId parameter")
            })?;
            let game_id = parse_game_id(&raw)?;

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;

            // The pool must not be touched while a shared txn holds the
            // only SQLite connection.
            let found = if let Some(shared_txn) = SharedTxn::from_req(&req) {
                games::find_by_id(shared_txn.transaction(), game_id).await?
            } else {
                let db = require_db(app_state)?;
                games::find_by_id(db, game_id).await?
            };

            if found.is_none() {
                return Err(AppError::not_found(
                    ErrorCode::GameNotFound,
                    format!("Game {game_id} not found"),
                ));
            }

            Ok(GameId(game_id))
        })
    }
}
