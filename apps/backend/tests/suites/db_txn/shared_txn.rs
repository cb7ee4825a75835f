use actix_web::test::TestRequest;
use actix_web::HttpMessage;
use quipreel::adapters::games_sea::{self, GameCreate};
use quipreel::db::require_db;
use quipreel::db::txn::{with_txn, SharedTxn};
use quipreel::AppError;

use crate::support::build_test_state;

#[tokio::test]
async fn with_txn_reuses_the_shared_transaction() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;

    let req = TestRequest::default().to_http_request();
    req.extensions_mut().insert(shared.clone());

    let game_id = with_txn(Some(&req), &state, |txn| {
        Box::pin(async move {
            let game = games_sea::create_game(txn, GameCreate::new("Shared Neuron")).await?;
            Ok::<_, AppError>(game.id)
        })
    })
    .await?;

    // Still visible: with_txn neither committed nor rolled back.
    let seen = games_sea::find_by_id(shared.transaction(), game_id).await?;
    assert!(seen.is_some());

    req.extensions_mut().remove::<SharedTxn>();
    shared.rollback().await?;

    assert!(games_sea::find_by_id(require_db(&state)?, game_id)
        .await?
        .is_none());
    Ok(())
}

#[tokio::test]
async fn from_req_is_none_without_injection() {
    let req = TestRequest::default().to_http_request();
    assert!(SharedTxn::from_req(&req).is_none());
}
