// Error mapping from domain and video errors into HTTP problems.
use std::time::Duration;

use actix_web::ResponseError;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::video_gen::VideoGenError;
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_400() {
    let app: AppError = DomainError::validation("content must not be empty").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn maps_conflicts() {
    let app: AppError = DomainError::conflict(ConflictKind::AlreadyVoted, "voted").into();
    assert_eq!(app.code().as_str(), "ALREADY_VOTED");
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError =
        DomainError::conflict(ConflictKind::MaxRoundsReached, "no more rounds").into();
    assert_eq!(app.code().as_str(), "MAX_ROUNDS_REACHED");

    let app: AppError = DomainError::conflict(ConflictKind::RoundExists, "dup round").into();
    assert_eq!(app.code().as_str(), "ROUND_ADVANCE_CONFLICT");

    let app: AppError =
        DomainError::conflict(ConflictKind::Other("Unique".into()), "generic").into();
    assert_eq!(app.code().as_str(), "CONFLICT");
}

#[test]
fn maps_not_found() {
    let app: AppError = DomainError::game_not_found(42).into();
    assert_eq!(app.code().as_str(), "GAME_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError = DomainError::not_found(NotFoundKind::Submission, "gone").into();
    assert_eq!(app.code().as_str(), "SUBMISSION_NOT_FOUND");
}

#[test]
fn maps_game_state_errors() {
    let app: AppError = DomainError::GameInactive(7).into();
    assert_eq!(app.code(), ErrorCode::GameInactive);
    assert_eq!(app.status().as_u16(), 409);

    let app: AppError = DomainError::NotAPlayer(3).into();
    assert_eq!(app.code(), ErrorCode::NotAPlayer);
    assert_eq!(app.status().as_u16(), 403);
}

#[test]
fn maps_infra() {
    let app: AppError = DomainError::infra(InfraErrorKind::Timeout, "timeout").into();
    assert_eq!(app.code().as_str(), "DB_TIMEOUT");
    assert_eq!(app.status().as_u16(), 504);

    let app: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 503);
}

#[test]
fn maps_video_errors() {
    let app: AppError = VideoGenError::Timeout(Duration::from_secs(5)).into();
    assert_eq!(app.code(), ErrorCode::GenerationTimeout);
    assert_eq!(app.status().as_u16(), 504);

    let app: AppError = VideoGenError::Api("upstream 500".into()).into();
    assert_eq!(app.code(), ErrorCode::GenerationFailed);
    assert_eq!(app.status().as_u16(), 502);
}

#[actix_web::test]
async fn problem_details_body_shape() {
    let resp = AppError::not_found(ErrorCode::GameNotFound, "Game 9 not found").error_response();
    assert_eq!(resp.status().as_u16(), 404);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/problem+json"
    );
    let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["code"], "GAME_NOT_FOUND");
    assert_eq!(json["title"], "Game Not Found");
    assert_eq!(json["type"], "https://quipreel.app/errors/GAME_NOT_FOUND");
    assert_eq!(json["trace_id"], "unknown");
}
