//! Background coordinator that drives `advance_if_due` for active games.

use std::time::Duration;

use sea_orm::{DatabaseConnection, TransactionTrait};
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::game_flow::{AdvanceOutcome, GameFlowService};
use crate::error::AppError;
use crate::repos::games;

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub checked: usize,
    pub advanced: usize,
    pub failed: usize,
}

/// Run `advance_if_due` once for every active game, each in its own
/// transaction. A failure on one game is logged and does not stop the rest.
pub async fn run_tick(
    db: &DatabaseConnection,
    service: &GameFlowService,
    now: OffsetDateTime,
) -> Result<TickReport, AppError> {
    let game_ids = games::list_active_ids(db).await?;
    let mut report = TickReport {
        checked: game_ids.len(),
        ..TickReport::default()
    };

    for game_id in game_ids {
        match tick_game(db, service, game_id, now).await {
            Ok(AdvanceOutcome::Advanced(round)) => {
                report.advanced += 1;
                debug!(game_id, round = round.round_number, "round clock advanced game");
            }
            Ok(AdvanceOutcome::NotDue) => {}
            Err(e) => {
                report.failed += 1;
                warn!(game_id, error = %e, "round clock failed to advance game");
            }
        }
    }

    Ok(report)
}

async fn tick_game(
    db: &DatabaseConnection,
    service: &GameFlowService,
    game_id: i64,
    now: OffsetDateTime,
) -> Result<AdvanceOutcome, AppError> {
    let txn = db.begin().await?;
    match service.advance_if_due(&txn, game_id, now).await {
        Ok(outcome) => {
            txn.commit().await?;
            Ok(outcome)
        }
        Err(e) => {
            if let Err(rollback) = txn.rollback().await {
                debug!(game_id, error = %rollback, "round clock rollback failed");
            }
            Err(e)
        }
    }
}

/// Spawn the clock on the current runtime. Ticks every `interval` until
/// the handle is aborted.
pub fn spawn_round_clock(
    db: DatabaseConnection,
    service: GameFlowService,
    interval: Duration,
) -> JoinHandle<()> {
    info!(interval_ms = interval.as_millis() as u64, "round clock started");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match run_tick(&db, &service, OffsetDateTime::now_utc()).await {
                Ok(report) if report.advanced > 0 || report.failed > 0 => {
                    info!(
                        checked = report.checked,
                        advanced = report.advanced,
                        failed = report.failed,
                        "round clock tick"
                    );
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "round clock tick failed"),
            }
        }
    })
}
