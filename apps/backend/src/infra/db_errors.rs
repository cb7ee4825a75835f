//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return `sea_orm::DbErr`; repos convert here, and higher layers
//! map `DomainError` to `AppError` via `From`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Prefix for `DbErr::Custom` raised by adapters when a game row is missing.
pub const GAME_NOT_FOUND_PREFIX: &str = "GAME_NOT_FOUND:";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// First `table.column` after SQLite's "UNIQUE constraint failed: " marker.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let marker = "UNIQUE constraint failed: ";
    let start = error_msg.find(marker)? + marker.len();
    error_msg[start..]
        .split(|c: char| c == ',' || c.is_whitespace() || c == '"')
        .next()
        .filter(|s| !s.is_empty())
}

/// Unique indexes with a domain meaning, matched by Postgres index name or
/// by the first `table.column` SQLite reports.
fn map_unique_violation(error_msg: &str) -> Option<DomainError> {
    let sqlite_col = extract_sqlite_table_column(error_msg);
    let hit = |pg_index: &str, sqlite_col_name: &str| {
        error_msg.contains(pg_index) || sqlite_col == Some(sqlite_col_name)
    };

    let (kind, detail) = if hit("ux_votes_session_round", "votes.session_id") {
        (
            ConflictKind::AlreadyVoted,
            "Session already voted in this round",
        )
    } else if hit("ux_submissions_session_round", "submissions.session_id") {
        (
            ConflictKind::AlreadySubmitted,
            "Session already submitted a prompt for this round",
        )
    } else if hit("ux_sessions_game_player_slot", "sessions.game_id") {
        (ConflictKind::PlayerSlotTaken, "Player slot already taken")
    } else if hit("ux_game_rounds_game_round", "game_rounds.game_id") {
        (ConflictKind::RoundExists, "Round already exists")
    } else if hit("ux_videos_task_uuid", "videos.task_uuid") {
        (
            ConflictKind::Other("VideoExists".into()),
            "Video already recorded",
        )
    } else {
        return None;
    };

    Some(DomainError::conflict(kind, detail))
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(GAME_NOT_FOUND_PREFIX) => {
            let parsed = msg[GAME_NOT_FOUND_PREFIX.len()..].parse::<i64>().ok();
            return match parsed {
                Some(game_id) => {
                    warn!(trace_id = %trace_id, game_id, "Game not found");
                    DomainError::game_not_found(game_id)
                }
                None => DomainError::not_found(NotFoundKind::Game, "Game not found"),
            };
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");
        return map_unique_violation(&error_msg).unwrap_or_else(|| {
            DomainError::conflict(
                ConflictKind::Other("Unique".into()),
                "Unique constraint violation",
            )
        });
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::validation("Referenced record does not exist");
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}
