use std::time::Duration;

use super::env_or;
use crate::domain::rules::{DEFAULT_MAX_ROUNDS, DEFAULT_ROUND_DURATION};
use crate::error::AppError;

/// Tunables for game pacing and the video generation budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub max_rounds: i16,
    pub round_duration: Duration,
    pub generation_timeout: Duration,
    pub clock_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            round_duration: DEFAULT_ROUND_DURATION,
            generation_timeout: Duration::from_secs(180),
            clock_interval: Duration::from_secs(5),
        }
    }
}

impl GameConfig {
    /// Reads `MAX_ROUNDS`, `ROUND_DURATION_SECS`, `VIDEO_GEN_TIMEOUT_SECS`
    /// and `ROUND_CLOCK_INTERVAL_SECS`.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let config = Self {
            max_rounds: env_or("MAX_ROUNDS", defaults.max_rounds)?,
            round_duration: Duration::from_secs(env_or(
                "ROUND_DURATION_SECS",
                defaults.round_duration.as_secs(),
            )?),
            generation_timeout: Duration::from_secs(env_or(
                "VIDEO_GEN_TIMEOUT_SECS",
                defaults.generation_timeout.as_secs(),
            )?),
            clock_interval: Duration::from_secs(env_or(
                "ROUND_CLOCK_INTERVAL_SECS",
                defaults.clock_interval.as_secs(),
            )?),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_rounds < 1 {
            return Err(AppError::config("MAX_ROUNDS must be at least 1"));
        }
        if self.round_duration.is_zero() {
            return Err(AppError::config("ROUND_DURATION_SECS must be positive"));
        }
        if self.generation_timeout.is_zero() {
            return Err(AppError::config("VIDEO_GEN_TIMEOUT_SECS must be positive"));
        }
        if self.clock_interval.is_zero() {
            return Err(AppError::config("ROUND_CLOCK_INTERVAL_SECS must be positive"));
        }
        Ok(())
    }
}
