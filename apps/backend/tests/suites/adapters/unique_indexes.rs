use quipreel::adapters::games_sea::{self, GameCreate};
use quipreel::adapters::rounds_sea::{self, RoundCreate};
use quipreel::adapters::sessions_sea::{self, SessionCreate};
use quipreel::db::require_db;
use quipreel::errors::domain::{ConflictKind, DomainError};
use quipreel::infra::db_errors::map_db_err;
use quipreel::services::game_flow::GameFlowService;
use quipreel::AppError;
use sea_orm::TransactionTrait;

use crate::support::build_test_state;
use crate::support::factory::{create_table, submit};

#[tokio::test]
async fn duplicate_player_slot_is_slot_taken() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let game = games_sea::create_game(&txn, GameCreate::new("Model Epoch")).await?;

    let seat = |name: &str| SessionCreate {
        game_id: game.id,
        display_name: name.to_string(),
        avatar: String::new(),
        player_slot: Some(1),
    };
    sessions_sea::create_session(&txn, seat("first")).await?;
    let err = sessions_sea::create_session(&txn, seat("second"))
        .await
        .unwrap_err();
    assert!(matches!(
        map_db_err(err),
        DomainError::Conflict(ConflictKind::PlayerSlotTaken, _)
    ));

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn duplicate_round_number_is_round_exists() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let game = games_sea::create_game(&txn, GameCreate::new("Neuron Token")).await?;

    let round = |topic: &str| RoundCreate {
        game_id: game.id,
        round_number: 1,
        content: topic.to_string(),
    };
    rounds_sea::create_round(&txn, round("Neuron")).await?;
    let err = rounds_sea::create_round(&txn, round("Token"))
        .await
        .unwrap_err();
    assert!(matches!(
        map_db_err(err),
        DomainError::Conflict(ConflictKind::RoundExists, _)
    ));

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn second_vote_in_round_hits_unique_index() -> Result<(), AppError> {
    use quipreel::adapters::votes_sea::{self, VoteCreate};

    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let table = create_table(&txn, &service).await?;
    let first = submit(&txn, &service, table.player_one.id, "first").await?;
    let second = submit(&txn, &service, table.player_two.id, "second").await?;

    let vote = |submission_id: i64| VoteCreate {
        session_id: table.voter.id,
        submission_id,
        round_id: table.round.id,
    };
    votes_sea::create_vote(&txn, vote(first.id)).await?;
    // Bypasses the service's early check to reach the index.
    let err = votes_sea::create_vote(&txn, vote(second.id))
        .await
        .unwrap_err();
    assert!(matches!(
        map_db_err(err),
        DomainError::Conflict(ConflictKind::AlreadyVoted, _)
    ));

    txn.rollback().await?;
    Ok(())
}
