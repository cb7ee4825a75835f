use quipreel::db::require_db;
use quipreel::domain::{Role, MAX_PLAYERS};
use quipreel::services::game_flow::GameFlowService;
use quipreel::utils::words::TOPIC_WORDS;
use quipreel::{AppError, ErrorCode};
use sea_orm::TransactionTrait;

use crate::support::build_test_state;

#[tokio::test]
async fn create_game_opens_round_one() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();

    let created = service.create_game(&txn).await?;

    assert!(created.game.is_active);
    assert_eq!(created.game.current_round, 1);
    assert!(created.game.ended_at.is_none());
    assert_eq!(created.round.round_number, 1);
    assert_eq!(created.round.game_id, created.game.id);
    assert!(TOPIC_WORDS.contains(&created.round.topic.as_str()));

    let words: Vec<&str> = created.game.name.split(' ').collect();
    assert_eq!(words.len(), 2);
    assert!(words.iter().all(|w| TOPIC_WORDS.contains(w)));

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn first_two_joins_are_players_then_voters() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let game = service.create_game(&txn).await?.game;

    let mut sessions = Vec::new();
    for name in ["Ada", "Linus", "Grace", "Ken", "Barbara"] {
        sessions.push(service.join_game(&txn, game.id, name, None).await?);
    }

    let players: Vec<_> = sessions.iter().filter(|s| s.is_player()).collect();
    assert_eq!(players.len(), MAX_PLAYERS);
    assert_eq!(sessions[0].player_slot, Some(1));
    assert_eq!(sessions[1].player_slot, Some(2));
    assert!(sessions[2..]
        .iter()
        .all(|s| s.role == Role::Voter && s.player_slot.is_none()));

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn join_trims_name_and_keeps_avatar() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let game = service.create_game(&txn).await?.game;

    let session = service
        .join_game(&txn, game.id, "  Ada  ", Some("🐙"))
        .await?;
    assert_eq!(session.display_name, "Ada");
    assert_eq!(session.avatar, "🐙");

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn join_rejects_bad_names() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let service = GameFlowService::default();
    let game = service.create_game(&txn).await?.game;

    for bad in ["", "   ", &"x".repeat(33)] {
        let err = service.join_game(&txn, game.id, bad, None).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError, "name {bad:?}");
    }

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn join_unknown_game_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;

    let err = GameFlowService::default()
        .join_game(&txn, 987_654, "Ada", None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::GameNotFound);

    txn.rollback().await?;
    Ok(())
}
