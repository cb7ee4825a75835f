use std::time::Duration;

use quipreel::adapters::rounds_sea::{self, RoundCreate};
use quipreel::db::require_db;
use quipreel::repos::{games, rounds};
use quipreel::services::game_flow::GameFlowService;
use quipreel::services::round_clock::{run_tick, TickReport};
use quipreel::AppError;
use time::OffsetDateTime;

use crate::support::build_test_state;

// The clock commits per game, so these tests write straight to the
// test's private database instead of a rolled-back transaction.

#[tokio::test]
async fn tick_advances_only_due_active_games() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = GameFlowService::default();

    let running = service.create_game(db).await?.game;
    let ended = service.create_game(db).await?.game;
    service.end_game(db, ended.id).await?;

    let early = run_tick(db, &service, OffsetDateTime::now_utc()).await?;
    assert_eq!(
        early,
        TickReport {
            checked: 1,
            advanced: 0,
            failed: 0
        }
    );

    let later = OffsetDateTime::now_utc() + Duration::from_secs(61);
    let report = run_tick(db, &service, later).await?;
    assert_eq!(report.advanced, 1);
    assert_eq!(rounds::count_by_game(db, running.id).await?, 2);
    assert_eq!(rounds::count_by_game(db, ended.id).await?, 1);

    Ok(())
}

#[tokio::test]
async fn failing_game_is_counted_and_the_rest_still_advance() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = GameFlowService::default();

    let healthy = service.create_game(db).await?.game;
    let broken = service.create_game(db).await?.game;
    // A stray round 2 makes the next insert for this game hit the unique index.
    rounds_sea::create_round(
        db,
        RoundCreate {
            game_id: broken.id,
            round_number: 2,
            content: "stray".to_string(),
        },
    )
    .await?;

    let later = OffsetDateTime::now_utc() + Duration::from_secs(61);
    let report = run_tick(db, &service, later).await?;
    assert_eq!(
        report,
        TickReport {
            checked: 2,
            advanced: 1,
            failed: 1
        }
    );
    assert_eq!(rounds::count_by_game(db, healthy.id).await?, 2);

    // The failed game's swap was rolled back with its transaction.
    let after = games::require_game(db, broken.id).await?;
    assert_eq!(after.current_round, 1);
    assert_eq!(after.lock_version, broken.lock_version);

    Ok(())
}

#[tokio::test]
async fn tick_without_games_is_a_no_op() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let report = run_tick(db, &GameFlowService::default(), OffsetDateTime::now_utc()).await?;
    assert_eq!(report, TickReport::default());

    Ok(())
}
