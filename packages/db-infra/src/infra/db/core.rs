use std::future::Future;
use std::time::{Duration, Instant};

use migration::{migrate, MigrationCommand, Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use tracing::{info, trace, warn};

use crate::config::db::{
    build_session_statements, make_conn_spec, validate_db_config, DbKind, DbOwner, RuntimeEnv,
};
use crate::error::DbInfraError;

fn get_db_engine(db_kind: DbKind) -> &'static str {
    match db_kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, DbInfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbInfraError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(attempts = attempt, interval_ms, "connection retry succeeded");
                }
                return Ok(result);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    warn!(
                        attempt,
                        max_attempts, interval_ms, "connection attempt failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| DbInfraError::connect("no connection attempt was made")))
}

/// Single-connection pool with owner credentials, used for migrations.
pub async fn build_admin_pool(
    env: RuntimeEnv,
    db_kind: DbKind,
) -> Result<DatabaseConnection, DbInfraError> {
    let url = make_conn_spec(env, db_kind, DbOwner::Owner)?;

    let mut opt = ConnectOptions::new(&url);
    opt.min_connections(1)
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(2))
        .sqlx_logging(false);

    if matches!(db_kind, DbKind::Postgres) {
        retry_connection(
            || {
                let opt = opt.clone();
                async move {
                    Database::connect(opt).await.map_err(|e| {
                        DbInfraError::connect(format!(
                            "failed to connect to Postgres (admin pool): {e}"
                        ))
                    })
                }
            },
            5,
            500,
        )
        .await
    } else {
        if let DbKind::SqliteFile = db_kind {
            ensure_sqlite_dir(env)?;
        }
        Database::connect(opt).await.map_err(|e| {
            DbInfraError::connect(format!("failed to connect to database (admin pool): {e}"))
        })
    }
}

fn ensure_sqlite_dir(env: RuntimeEnv) -> Result<(), DbInfraError> {
    let path = crate::config::db::sqlite_file_path(env);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DbInfraError::config(format!(
                "failed to create SQLite directory {}: {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

/// Mask the password in a connection string before it is logged or hashed.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth_part, host_part)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    match auth_part.rfind(':') {
        Some(colon_pos) if !auth_part[..colon_pos].ends_with('/') => {
            format!("{}:***@{}", &auth_part[..colon_pos], host_part)
        }
        _ => url.to_string(),
    }
}

/// Stable 64-bit FNV-1a of the lock key; the advisory lock id must not
/// change between processes or releases.
fn advisory_lock_id(key: &str) -> i64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in key.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash as i64
}

async fn schema_is_current(conn: &DatabaseConnection) -> Result<bool, DbInfraError> {
    let expected: Vec<String> = Migrator::migrations()
        .iter()
        .map(|m| m.name().to_string())
        .collect();

    let applied = match Migrator::get_applied_migrations(conn).await {
        Ok(migrations) => migrations,
        Err(DbErr::Exec(_)) => {
            trace!(fastpath = "miss", reason = "migration_table_missing");
            return Ok(false);
        }
        Err(e) => {
            return Err(DbInfraError::migration(format!(
                "failed to get applied migrations: {e}"
            )))
        }
    };

    let applied: Vec<String> = applied.iter().map(|m| m.name().to_string()).collect();
    let current = applied == expected;
    trace!(
        fastpath = if current { "hit" } else { "miss" },
        applied_count = applied.len(),
        expected_count = expected.len()
    );
    Ok(current)
}

async fn apply_session_settings(
    pool: &DatabaseConnection,
    db_kind: DbKind,
) -> Result<(), DbInfraError> {
    let backend = sea_orm::DatabaseBackend::from(db_kind);
    for stmt in build_session_statements(db_kind) {
        pool.execute(Statement::from_string(backend, stmt))
            .await
            .map_err(|e| DbInfraError::config(format!("failed to apply db settings: {e}")))?;
    }
    Ok(())
}

/// Validate config, open an admin pool and run `command`.
pub async fn orchestrate_migration(
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    validate_db_config(env, db_kind)?;

    let admin_pool = build_admin_pool(env, db_kind).await?;

    orchestrate_migration_internal(&admin_pool, env, db_kind, command).await
}

/// Run `command` on an existing pool.
///
/// Postgres runs under a session advisory lock so concurrent server
/// replicas migrate one at a time; `Up` is skipped when the applied
/// migrations already match the compiled list.
pub async fn orchestrate_migration_internal(
    pool: &DatabaseConnection,
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    let start = Instant::now();
    info!(
        env = ?env,
        db_kind = ?db_kind,
        engine = get_db_engine(db_kind),
        command = ?command,
        "migrate=start"
    );

    apply_session_settings(pool, db_kind).await?;

    if matches!(command, MigrationCommand::Up) && schema_is_current(pool).await? {
        info!("migrate=skipped up_to_date=true");
        return Ok(());
    }

    let lock_id = match db_kind {
        DbKind::Postgres => {
            let url = make_conn_spec(env, db_kind, DbOwner::Owner)?;
            let id = advisory_lock_id(&format!("quipreel:migrate:{}", sanitize_db_url(&url)));
            pool.execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                format!("SELECT pg_advisory_lock({id})"),
            ))
            .await
            .map_err(|e| DbInfraError::migration(format!("failed to take migration lock: {e}")))?;
            Some(id)
        }
        DbKind::SqliteFile | DbKind::SqliteMemory => None,
    };

    // Another replica may have finished while we waited on the lock.
    let result = if lock_id.is_some()
        && matches!(command, MigrationCommand::Up)
        && schema_is_current(pool).await?
    {
        Ok(())
    } else {
        migrate(pool, command)
            .await
            .map_err(|e| DbInfraError::migration(format!("migration execution failed: {e}")))
    };

    if let Some(id) = lock_id {
        if let Err(e) = pool
            .execute(Statement::from_string(
                sea_orm::DatabaseBackend::Postgres,
                format!("SELECT pg_advisory_unlock({id})"),
            ))
            .await
        {
            warn!(error = %e, "failed to release migration lock");
        }
    }

    result?;

    if matches!(
        command,
        MigrationCommand::Up | MigrationCommand::Fresh | MigrationCommand::Refresh
    ) && !schema_is_current(pool).await?
    {
        return Err(DbInfraError::migration(format!(
            "migration verification failed: applied migrations do not match the {} defined (env={env:?}, db_kind={db_kind:?})",
            Migrator::migrations().len()
        )));
    }

    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "migrate=done"
    );
    Ok(())
}
