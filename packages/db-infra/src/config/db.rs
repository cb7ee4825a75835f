use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::DbInfraError;

/// Which database the process talks to: production data or the disposable test copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Prod,
    Test,
}

/// Storage engine backing the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    /// One private database per pool; used by the test suites.
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = DbInfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite_file" | "sqlite" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "sqlite_memory" | "memory" => Ok(DbKind::SqliteMemory),
            other => Err(DbInfraError::config(format!(
                "unknown database kind '{other}' (expected postgres | sqlite-file | sqlite-memory)"
            ))),
        }
    }
}

impl From<DbKind> for sea_orm::DatabaseBackend {
    fn from(kind: DbKind) -> Self {
        match kind {
            DbKind::Postgres => sea_orm::DatabaseBackend::Postgres,
            DbKind::SqliteFile | DbKind::SqliteMemory => sea_orm::DatabaseBackend::Sqlite,
        }
    }
}

/// Database owner enum for different access levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    /// Application-level access (limited permissions)
    App,
    /// Owner-level access (full permissions for migrations)
    Owner,
}

/// Reject configurations that could point tests at production data.
pub fn validate_db_config(env: RuntimeEnv, db_kind: DbKind) -> Result<(), DbInfraError> {
    match (env, db_kind) {
        (RuntimeEnv::Prod, DbKind::SqliteMemory) => Err(DbInfraError::config(
            "in-memory SQLite is only allowed in the test environment",
        )),
        (RuntimeEnv::Test, DbKind::Postgres) => {
            let db_name = must_var("TEST_DB")?;
            if !db_name.ends_with("_test") {
                return Err(DbInfraError::config(format!(
                    "Test environment requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Build the connection string for the given environment, engine and role.
pub fn make_conn_spec(
    env: RuntimeEnv,
    db_kind: DbKind,
    owner: DbOwner,
) -> Result<String, DbInfraError> {
    match db_kind {
        DbKind::Postgres => {
            let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
            let db_name = match env {
                RuntimeEnv::Prod => must_var("PROD_DB")?,
                RuntimeEnv::Test => must_var("TEST_DB")?,
            };
            let (user, password) = match owner {
                DbOwner::App => (must_var("APP_DB_USER")?, must_var("APP_DB_PASSWORD")?),
                DbOwner::Owner => (
                    must_var("QUIPREEL_OWNER_USER")?,
                    must_var("QUIPREEL_OWNER_PASSWORD")?,
                ),
            };
            Ok(postgres_url(&host, &port, &db_name, &user, &password))
        }
        DbKind::SqliteFile => {
            let path = sqlite_file_path(env);
            Ok(format!("sqlite://{}?mode=rwc", path.display()))
        }
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

/// Credentials are percent-encoded so passwords may contain URL metacharacters.
pub fn postgres_url(host: &str, port: &str, db_name: &str, user: &str, password: &str) -> String {
    let user = utf8_percent_encode(user, NON_ALPHANUMERIC);
    let password = utf8_percent_encode(password, NON_ALPHANUMERIC);
    format!("postgresql://{user}:{password}@{host}:{port}/{db_name}")
}

/// `$SQLITE_DB_DIR/quipreel.db` or `quipreel_test.db`, defaulting to `./data/sqlite`.
pub fn sqlite_file_path(env: RuntimeEnv) -> PathBuf {
    let dir = env::var("SQLITE_DB_DIR").unwrap_or_else(|_| "./data/sqlite".to_string());
    let file = match env {
        RuntimeEnv::Prod => "quipreel.db",
        RuntimeEnv::Test => "quipreel_test.db",
    };
    PathBuf::from(dir).join(file)
}

/// Per-connection statements applied before migrating.
pub fn build_session_statements(db_kind: DbKind) -> Vec<String> {
    match db_kind {
        DbKind::SqliteFile | DbKind::SqliteMemory => vec![
            "PRAGMA foreign_keys = ON;".to_string(),
            "PRAGMA busy_timeout = 5000;".to_string(),
        ],
        DbKind::Postgres => vec![
            "SET application_name = 'quipreel';".to_string(),
            "SET timezone = 'UTC';".to_string(),
        ],
    }
}

fn must_var(name: &str) -> Result<String, DbInfraError> {
    env::var(name).map_err(|_| {
        DbInfraError::config(format!("Required environment variable '{name}' is not set"))
    })
}
