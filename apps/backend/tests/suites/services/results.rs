use quipreel::db::require_db;
use quipreel::domain::Standing;
use quipreel::services::game_flow::GameFlowService;
use quipreel::{AppError, ErrorCode};
use sea_orm::TransactionTrait;

use crate::support::build_test_state;
use crate::support::factory::{create_table, submit};

#[tokio::test]
async fn cat_skateboarding_round_results() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;

    let submission = submit(&txn, &service, table.player_one.id, "a cat skateboarding").await?;
    service.cast_vote(&txn, table.voter.id, submission.id).await?;

    let results = service.round_results(&txn, table.game.id).await?;
    assert_eq!(results.round.id, table.round.id);
    assert_eq!(results.submissions, vec![submission.clone()]);
    assert_eq!(results.votes.len(), 1);
    assert_eq!(results.votes.get(&submission.id), Some(&1));

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn unvoted_submissions_are_absent_from_tally() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;

    let voted = submit(&txn, &service, table.player_one.id, "voted").await?;
    let ignored = submit(&txn, &service, table.player_two.id, "ignored").await?;
    service.cast_vote(&txn, table.voter.id, voted.id).await?;

    let results = service.round_results(&txn, table.game.id).await?;
    assert_eq!(results.submissions.len(), 2);
    assert!(!results.votes.contains_key(&ignored.id));

    // Recomputing the tally gives the same answer.
    assert_eq!(service.round_results(&txn, table.game.id).await?, results);

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn game_results_sum_votes_across_rounds() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;
    let (p1, p2, voter) = (table.player_one.id, table.player_two.id, table.voter.id);

    let a = submit(&txn, &service, p1, "round one by p1").await?;
    let b = submit(&txn, &service, p2, "round one by p2").await?;
    service.cast_vote(&txn, voter, a.id).await?;
    service.cast_vote(&txn, p2, a.id).await?;
    service.cast_vote(&txn, p1, b.id).await?;

    service.advance_round(&txn, table.game.id).await?;
    let c = submit(&txn, &service, p2, "round two by p2").await?;
    service.cast_vote(&txn, voter, c.id).await?;

    let results = service.game_results(&txn, table.game.id).await?;
    assert_eq!(results.rounds.len(), 2);
    assert_eq!(results.sessions.len(), 3);
    assert_eq!(
        results.standings,
        vec![
            Standing { session_id: p1, votes: 2 },
            Standing { session_id: p2, votes: 2 },
        ]
    );
    assert_eq!(results.winners, vec![p1, p2]);

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn results_for_unknown_game_are_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();

    let err = service.round_results(&txn, 8_888).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotFound);
    let err = service.game_results(&txn, 8_888).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotFound);

    txn.rollback().await?;
    Ok(())
}
