use backend_test_support::unique_helpers::unique_task_uuid;
use quipreel::adapters::videos_sea::{self, VideoUpsert};
use quipreel::db::require_db;
use quipreel::AppError;
use sea_orm::TransactionTrait;

use crate::support::build_test_state;

fn upsert_for(task_uuid: &str, status: &str, cost: Option<f64>) -> VideoUpsert {
    VideoUpsert {
        task_uuid: task_uuid.to_string(),
        video_url: "https://cdn.example.com/v.mp4".to_string(),
        status: status.to_string(),
        prompt: "a cat skateboarding".to_string(),
        model: "bytedance:1@1".to_string(),
        width: 864.0,
        height: 480.0,
        cost,
        seed: None,
    }
}

#[tokio::test]
async fn upsert_inserts_then_updates() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;
    let task_uuid = unique_task_uuid();

    let inserted = videos_sea::upsert(&txn, upsert_for(&task_uuid, "processing", None)).await?;
    let updated = videos_sea::upsert(&txn, upsert_for(&task_uuid, "success", Some(0.5))).await?;

    assert_eq!(inserted.id, updated.id);
    assert_eq!(updated.status, "success");
    assert_eq!(updated.cost, Some(0.5));
    assert_eq!(videos_sea::count(&txn).await?, 1);

    txn.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn find_by_task_uuid_misses_cleanly() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let txn = require_db(&state)?.begin().await?;

    assert!(videos_sea::find_by_task_uuid(&txn, &unique_task_uuid())
        .await?
        .is_none());
    assert!(videos_sea::list(&txn, 10, 0).await?.is_empty());

    txn.rollback().await?;
    Ok(())
}
