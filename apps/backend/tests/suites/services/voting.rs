use quipreel::db::require_db;
use quipreel::services::game_flow::GameFlowService;
use quipreel::{AppError, ErrorCode};
use sea_orm::TransactionTrait;

use crate::support::build_test_state;
use crate::support::factory::{create_table, submit};

#[tokio::test]
async fn vote_is_recorded_against_submission_round() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;
    let submission = submit(&txn, &service, table.player_one.id, "a cat skateboarding").await?;

    let vote = service.cast_vote(&txn, table.voter.id, submission.id).await?;
    assert_eq!(vote.session_id, table.voter.id);
    assert_eq!(vote.submission_id, submission.id);
    assert_eq!(vote.round_id, table.round.id);

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn one_vote_per_session_per_round() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;
    let first = submit(&txn, &service, table.player_one.id, "first").await?;
    let second = submit(&txn, &service, table.player_two.id, "second").await?;

    service.cast_vote(&txn, table.voter.id, first.id).await?;
    let err = service
        .cast_vote(&txn, table.voter.id, second.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AlreadyVoted);
    assert_eq!(err.status().as_u16(), 409);

    // Players vote too.
    service.cast_vote(&txn, table.player_one.id, second.id).await?;

    let results = service.round_results(&txn, table.game.id).await?;
    assert_eq!(results.votes.get(&first.id), Some(&1));
    assert_eq!(results.votes.get(&second.id), Some(&1));

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn voting_in_a_new_round_is_allowed() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;

    let round_one = submit(&txn, &service, table.player_one.id, "round one").await?;
    service.cast_vote(&txn, table.voter.id, round_one.id).await?;

    service.advance_round(&txn, table.game.id).await?;
    let round_two = submit(&txn, &service, table.player_one.id, "round two").await?;
    service.cast_vote(&txn, table.voter.id, round_two.id).await?;

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn submission_from_another_game_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let here = create_table(&txn, &service).await?;
    let there = create_table(&txn, &service).await?;
    let foreign = submit(&txn, &service, there.player_one.id, "elsewhere").await?;

    let err = service
        .cast_vote(&txn, here.voter.id, foreign.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::SubmissionNotFound);

    let err = service
        .cast_vote(&txn, here.voter.id, 555_555)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::SubmissionNotFound);

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn vote_after_end_is_game_inactive() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;
    let submission = submit(&txn, &service, table.player_one.id, "before the end").await?;

    service.end_game(&txn, table.game.id).await?;
    let err = service
        .cast_vote(&txn, table.voter.id, submission.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameInactive);

    txn.rollback().await?;
    Ok(())
}
