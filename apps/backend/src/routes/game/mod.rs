//! `/api/game` routes: lobby, prompt submission, voting and round control.

pub mod dto;

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use time::OffsetDateTime;

use self::dto::{
    AdvanceIfDueResponse, CreateGameResponse, EndGameResponse, GameRef, GameResultsResponse,
    JoinRequest, RoundDto, RoundResultsResponse, SessionDto, StatusResponse, SubmissionDto,
    SubmitRequest, VoteDto, VoteRequest,
};
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{GameId, SessionId, ValidatedJson, GAME_COOKIE, SESSION_COOKIE};
use crate::services::game_flow::AdvanceOutcome;
use crate::state::app_state::AppState;

fn id_cookie(name: &'static str, value: i64) -> Cookie<'static> {
    Cookie::build(name, value.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// POST /api/game/new
async fn create_game(
    http_req: HttpRequest,
    app_state: web::Data<AppState>,
) -> Result<web::Json<CreateGameResponse>, AppError> {
    let service = app_state.game_flow();

    let created = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { service.create_game(txn).await })
    })
    .await?;

    Ok(web::Json(CreateGameResponse {
        game: created.game.into(),
        round: created.round.into(),
    }))
}

/// POST /api/game/join
///
/// Sets the `sessionId` and `gameId` cookies used by later calls.
async fn join_game(
    http_req: HttpRequest,
    body: ValidatedJson<JoinRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let game_id = body.game_id()?;
    let JoinRequest { name, avatar, .. } = body.into_inner();
    let service = app_state.game_flow();

    let session = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move {
            service
                .join_game(txn, game_id, &name, avatar.as_deref())
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok()
        .cookie(id_cookie(SESSION_COOKIE, session.id))
        .cookie(id_cookie(GAME_COOKIE, session.game_id))
        .json(SessionDto::from(session)))
}

/// POST /api/game/submit
///
/// Validation and recording run in separate transactions; the video
/// generator runs between them with no transaction open.
async fn submit_prompt(
    http_req: HttpRequest,
    session: SessionId,
    body: ValidatedJson<SubmitRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<SubmissionDto>, AppError> {
    let generator = app_state.require_video()?;
    let service = app_state.game_flow();
    let session_id = session.0;
    let content = body.into_inner().content;

    let prepare = service.clone();
    let prepared = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move {
            prepare
                .prepare_submission(txn, session_id, &content)
                .await
        })
    })
    .await?;

    let video = service.generate_video(generator.as_ref(), &prepared).await?;

    let submission = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { service.record_submission(txn, prepared, video).await })
    })
    .await?;

    Ok(web::Json(submission.into()))
}

/// POST /api/game/vote
async fn cast_vote(
    http_req: HttpRequest,
    session: SessionId,
    body: ValidatedJson<VoteRequest>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<VoteDto>, AppError> {
    let service = app_state.game_flow();
    let session_id = session.0;
    let submission_id = body.submission_id;

    let vote = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { service.cast_vote(txn, session_id, submission_id).await })
    })
    .await?;

    Ok(web::Json(vote.into()))
}

/// POST /api/game/next
async fn advance_round(
    http_req: HttpRequest,
    body: ValidatedJson<GameRef>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<RoundDto>, AppError> {
    let game_id = body.game_id()?;
    let service = app_state.game_flow();

    let round = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { service.advance_round(txn, game_id).await })
    })
    .await?;

    Ok(web::Json(round.into()))
}

/// POST /api/game/advanceIfDue
async fn advance_if_due(
    http_req: HttpRequest,
    body: ValidatedJson<GameRef>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<AdvanceIfDueResponse>, AppError> {
    let game_id = body.game_id()?;
    let service = app_state.game_flow();
    let now = OffsetDateTime::now_utc();

    let outcome = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { service.advance_if_due(txn, game_id, now).await })
    })
    .await?;

    let response = match outcome {
        AdvanceOutcome::Advanced(round) => AdvanceIfDueResponse {
            advanced: true,
            round: Some(round.into()),
        },
        AdvanceOutcome::NotDue => AdvanceIfDueResponse {
            advanced: false,
            round: None,
        },
    };
    Ok(web::Json(response))
}

/// POST /api/game/end
async fn end_game(
    http_req: HttpRequest,
    body: ValidatedJson<GameRef>,
    app_state: web::Data<AppState>,
) -> Result<web::Json<EndGameResponse>, AppError> {
    let game_id = body.game_id()?;
    let service = app_state.game_flow();

    with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { service.end_game(txn, game_id).await })
    })
    .await?;

    Ok(web::Json(EndGameResponse {
        game_id,
        ended: true,
    }))
}

/// GET /api/game/status?gameId=
///
/// Read-only; polling never advances the round.
async fn status(
    http_req: HttpRequest,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<StatusResponse>, AppError> {
    let service = app_state.game_flow();
    let id = game_id.0;

    let status = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { service.status(txn, id).await })
    })
    .await?;

    Ok(web::Json(status.into()))
}

/// GET /api/game/roundResults?gameId=
async fn round_results(
    http_req: HttpRequest,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<RoundResultsResponse>, AppError> {
    let service = app_state.game_flow();
    let id = game_id.0;

    let results = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { service.round_results(txn, id).await })
    })
    .await?;

    Ok(web::Json(results.into()))
}

/// GET /api/game/results?gameId=
async fn game_results(
    http_req: HttpRequest,
    game_id: GameId,
    app_state: web::Data<AppState>,
) -> Result<web::Json<GameResultsResponse>, AppError> {
    let service = app_state.game_flow();
    let id = game_id.0;

    let results = with_txn(Some(&http_req), &app_state, move |txn| {
        Box::pin(async move { service.game_results(txn, id).await })
    })
    .await?;

    Ok(web::Json(results.into()))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/new", web::post().to(create_game))
        .route("/join", web::post().to(join_game))
        .route("/submit", web::post().to(submit_prompt))
        .route("/vote", web::post().to(cast_vote))
        .route("/next", web::post().to(advance_round))
        .route("/advanceIfDue", web::post().to(advance_if_due))
        .route("/end", web::post().to(end_game))
        .route("/status", web::get().to(status))
        .route("/roundResults", web::get().to(round_results))
        .route("/results", web::get().to(game_results));
}
