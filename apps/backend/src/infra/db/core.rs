use std::time::{Duration, Instant};

use db_infra::{orchestrate_migration, orchestrate_migration_internal, sanitize_db_url};
use migration::MigrationCommand;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use super::{DbKind, DbOwner, RuntimeEnv};
use crate::config::db::{make_conn_spec, validate_db_config};
use crate::error::AppError;

fn app_pool_options(url: &str, db_kind: DbKind) -> ConnectOptions {
    let mut opt = ConnectOptions::new(url);
    match db_kind {
        // Every in-memory connection is its own database.
        DbKind::SqliteMemory => opt.min_connections(1).max_connections(1),
        DbKind::SqliteFile => opt.min_connections(1).max_connections(4),
        DbKind::Postgres => opt.min_connections(2).max_connections(16),
    };
    opt.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    opt
}

/// Connect the application pool and bring the schema up to date.
///
/// Postgres and SQLite files migrate through a separate owner pool first.
/// In-memory SQLite migrates on the application pool itself because a
/// second pool would see a different, empty database.
pub async fn bootstrap_db(
    env: RuntimeEnv,
    db_kind: DbKind,
) -> Result<DatabaseConnection, AppError> {
    let start = Instant::now();
    validate_db_config(env, db_kind)?;

    let pool = match db_kind {
        DbKind::SqliteMemory => {
            let url = make_conn_spec(env, db_kind, DbOwner::App)?;
            let pool = Database::connect(app_pool_options(&url, db_kind)).await?;
            orchestrate_migration_internal(&pool, env, db_kind, MigrationCommand::Up).await?;
            pool
        }
        DbKind::SqliteFile | DbKind::Postgres => {
            orchestrate_migration(env, db_kind, MigrationCommand::Up).await?;
            let url = make_conn_spec(env, db_kind, DbOwner::App)?;
            Database::connect(app_pool_options(&url, db_kind))
                .await
                .map_err(|e| {
                    AppError::db(format!(
                        "failed to connect application pool to {}: {e}",
                        sanitize_db_url(&url)
                    ))
                })?
        }
    };

    info!(
        env = ?env,
        db_kind = ?db_kind,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "database ready"
    );
    Ok(pool)
}
