use super::env_or;
use crate::config::db::DbKind;
use crate::error::AppError;

/// Process-level settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_kind: DbKind,
}

impl ServerConfig {
    /// Reads `BACKEND_HOST`, `BACKEND_PORT` and `QUIPREEL_DB_KIND`.
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            host: env_or("BACKEND_HOST", "0.0.0.0".to_string())?,
            port: env_or("BACKEND_PORT", 3001u16)?,
            db_kind: env_or("QUIPREEL_DB_KIND", DbKind::Postgres)?,
        })
    }
}
