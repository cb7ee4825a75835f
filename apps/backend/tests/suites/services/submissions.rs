use std::sync::Arc;
use std::time::Duration;

use quipreel::config::game::GameConfig;
use quipreel::db::require_db;
use quipreel::repos::{submissions, videos};
use quipreel::services::game_flow::GameFlowService;
use quipreel::video_gen::FakeVideoGenerator;
use quipreel::{AppError, ErrorCode};
use sea_orm::TransactionTrait;

use crate::support::build_test_state;
use crate::support::factory::{create_table, submit};

#[tokio::test]
async fn player_submission_records_video() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;

    let generator = FakeVideoGenerator::succeeding();
    let submission = service
        .submit_prompt(&txn, &generator, table.player_one.id, "  a cat skateboarding ")
        .await?;

    assert_eq!(submission.content, "a cat skateboarding");
    assert_eq!(submission.round_id, table.round.id);
    assert_eq!(generator.prompts(), vec!["a cat skateboarding".to_string()]);

    let task_uuid = submission.video_task_uuid.clone().expect("task uuid recorded");
    let video = videos::require_by_task_uuid(&txn, &task_uuid).await?;
    assert_eq!(submission.result_url.as_deref(), Some(video.video_url.as_str()));
    assert_eq!(video.prompt, "a cat skateboarding");
    assert_eq!(video.status, "success");

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn voter_cannot_submit() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;

    let err = submit(&txn, &service, table.voter.id, "a dog surfing")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotAPlayer);
    assert_eq!(err.status().as_u16(), 403);

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn second_submission_in_round_conflicts() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;

    submit(&txn, &service, table.player_one.id, "first").await?;
    let err = submit(&txn, &service, table.player_one.id, "second")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadySubmitted);

    // The other player is unaffected.
    submit(&txn, &service, table.player_two.id, "other").await?;

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn unknown_session_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();

    let err = submit(&txn, &service, 424_242, "anything").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::SessionNotFound);

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn generator_failure_records_nothing() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;

    let generator = FakeVideoGenerator::failing();
    let err = service
        .submit_prompt(&txn, &generator, table.player_one.id, "a cat skateboarding")
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::GenerationFailed);
    assert_eq!(err.status().as_u16(), 502);
    assert!(submissions::find_all_by_round(&txn, table.round.id)
        .await?
        .is_empty());

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn generator_timeout_records_nothing() -> Result<(), AppError> {
    let config = GameConfig {
        generation_timeout: Duration::from_millis(50),
        ..GameConfig::default()
    };
    let generator = Arc::new(FakeVideoGenerator::slow(Duration::from_secs(5)));
    let state = crate::support::build_test_state_with(generator.clone(), config.clone()).await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::new(config);
    let table = create_table(&txn, &service).await?;

    let err = service
        .submit_prompt(&txn, generator.as_ref(), table.player_one.id, "slow prompt")
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::GenerationTimeout);
    assert_eq!(err.status().as_u16(), 504);
    assert!(submissions::find_all_by_round(&txn, table.round.id)
        .await?
        .is_empty());

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn submit_after_end_is_game_inactive() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;

    service.end_game(&txn, table.game.id).await?;
    let err = submit(&txn, &service, table.player_one.id, "too late")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::GameInactive { game_id } if game_id == table.game.id));

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn record_rechecks_game_is_still_active() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;
    let generator = FakeVideoGenerator::succeeding();

    let prepared = service
        .prepare_submission(&txn, table.player_one.id, "racing the clock")
        .await?;
    let video = service.generate_video(&generator, &prepared).await?;
    service.end_game(&txn, table.game.id).await?;

    let err = service
        .record_submission(&txn, prepared, video)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameInactive);

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn round_advancing_during_generation_is_round_closed() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;
    let generator = FakeVideoGenerator::succeeding();

    let prepared = service
        .prepare_submission(&txn, table.player_one.id, "slow render")
        .await?;
    let video = service.generate_video(&generator, &prepared).await?;
    let task_uuid = video.task_uuid.to_string();
    let next = service.advance_round(&txn, table.game.id).await?;
    assert_eq!(next.round_number, 2);

    let err = service
        .record_submission(&txn, prepared, video)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::RoundClosed);

    assert!(submissions::find_all_by_game(&txn, table.game.id)
        .await?
        .is_empty());
    let err = videos::require_by_task_uuid(&txn, &task_uuid)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        quipreel::errors::DomainError::NotFound(quipreel::errors::domain::NotFoundKind::Video, _)
    ));

    // The new round still takes the same player's prompt.
    let submission = submit(&txn, &service, table.player_one.id, "slow render").await?;
    assert_eq!(submission.round_id, next.id);

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn prompt_length_is_bounded() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;

    let err = submit(&txn, &service, table.player_one.id, &"x".repeat(501))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationError);
    submit(&txn, &service, table.player_one.id, &"x".repeat(500)).await?;

    txn.rollback().await?;
    Ok(())
}
