use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use super::{SESSION_COOKIE, SESSION_HEADER};
use crate::error::AppError;
use crate::errors::ErrorCode;

/// Session id from the `sessionId` cookie or the `x-session-id` header.
///
/// Only the format is checked here; the services resolve the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub i64);

fn extract(req: &HttpRequest) -> Result<SessionId, AppError> {
    let raw = req
        .cookie(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| {
            req.headers()
                .get(SESSION_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| {
            AppError::bad_request(ErrorCode::SessionRequired, "Join the game first")
        })?;

    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(SessionId(id)),
        _ => Err(AppError::bad_request(
            ErrorCode::InvalidSessionId,
            format!("Invalid session id: {raw}"),
        )),
    }
}

impl FromRequest for SessionId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}
