pub mod db;
pub mod game;
pub mod server;
pub mod video;

use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Parse an optional env var, falling back to `default` when unset or blank.
pub(crate) fn env_or<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse::<T>().map_err(|e| {
            AppError::config(format!("environment variable {name}='{raw}' is invalid: {e}"))
        }),
        _ => Ok(default),
    }
}
