use std::env;
use std::env::VarError;
use std::str::FromStr;
use std::sync::Arc;

use quipreel::config::db::{DbKind, RuntimeEnv};
use quipreel::config::game::GameConfig;
use quipreel::infra::state::{build_state, StateBuilder};
use quipreel::state::app_state::AppState;
use quipreel::video_gen::{FakeVideoGenerator, VideoGenerator};
use quipreel::AppError;

fn read_env_db_kind() -> Result<Option<String>, AppError> {
    match env::var("QUIPREEL_TEST_DB_KIND") {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(AppError::config(format!(
            "failed to read QUIPREEL_TEST_DB_KIND: {err}"
        ))),
    }
}

/// In-memory SQLite unless `QUIPREEL_TEST_DB_KIND` says otherwise.
pub fn resolve_test_db_kind() -> Result<DbKind, AppError> {
    match read_env_db_kind()? {
        Some(raw) => Ok(DbKind::from_str(&raw)?),
        None => Ok(DbKind::SqliteMemory),
    }
}

pub fn test_state_builder() -> Result<StateBuilder, AppError> {
    let db_kind = resolve_test_db_kind()?;
    Ok(build_state().with_env(RuntimeEnv::Test).with_db(db_kind))
}

/// Test database, default game config and a succeeding fake generator.
pub async fn build_test_state() -> Result<AppState, AppError> {
    build_test_state_with(Arc::new(FakeVideoGenerator::succeeding()), GameConfig::default()).await
}

pub async fn build_test_state_with(
    generator: Arc<dyn VideoGenerator>,
    game_config: GameConfig,
) -> Result<AppState, AppError> {
    test_state_builder()?
        .with_video_generator(generator)
        .with_game_config(game_config)
        .build()
        .await
}
