use quipreel::adapters::games_sea::{self, GameCreate};
use quipreel::db::require_db;
use quipreel::db::txn::with_txn;
use quipreel::db::txn_policy::{self, TxnPolicy};
use quipreel::{AppError, ErrorCode};

use crate::support::build_test_state;

#[tokio::test]
async fn ok_follows_the_process_policy() -> Result<(), AppError> {
    let state = build_test_state().await?;

    let game_id = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let game = games_sea::create_game(txn, GameCreate::new("Prompt Epoch")).await?;
            Ok::<_, AppError>(game.id)
        })
    })
    .await?;

    let found = games_sea::find_by_id(require_db(&state)?, game_id).await?;
    match txn_policy::current() {
        TxnPolicy::RollbackOnOk => assert!(found.is_none()),
        TxnPolicy::CommitOnOk => assert!(found.is_some()),
    }
    Ok(())
}

#[tokio::test]
async fn err_rolls_back_and_keeps_the_error() -> Result<(), AppError> {
    let state = build_test_state().await?;

    let err = with_txn(None, &state, |txn| {
        Box::pin(async move {
            let game = games_sea::create_game(txn, GameCreate::new("Agent Token")).await?;
            Err::<i64, AppError>(AppError::internal(format!("abort after game {}", game.id)))
        })
    })
    .await
    .unwrap_err();

    assert_eq!(err.code(), ErrorCode::Internal);
    let game_id: i64 = err
        .to_string()
        .rsplit(' ')
        .next()
        .and_then(|id| id.parse().ok())
        .expect("error names the game id");
    assert!(games_sea::find_by_id(require_db(&state)?, game_id)
        .await?
        .is_none());
    Ok(())
}
