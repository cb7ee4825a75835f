use std::sync::Arc;

use crate::config::db::{DbKind, RuntimeEnv};
use crate::config::game::GameConfig;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;
use crate::video_gen::VideoGenerator;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    env: RuntimeEnv,
    db_kind: Option<DbKind>,
    game_config: GameConfig,
    video: Option<Arc<dyn VideoGenerator>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            env: RuntimeEnv::Prod,
            db_kind: None,
            game_config: GameConfig::default(),
            video: None,
        }
    }

    pub fn with_env(mut self, env: RuntimeEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_db(mut self, db_kind: DbKind) -> Self {
        self.db_kind = Some(db_kind);
        self
    }

    pub fn with_game_config(mut self, game_config: GameConfig) -> Self {
        self.game_config = game_config;
        self
    }

    pub fn with_video_generator(mut self, generator: Arc<dyn VideoGenerator>) -> Self {
        self.video = Some(generator);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        self.game_config.validate()?;
        let db = match self.db_kind {
            // single entrypoint: build + migrate
            Some(kind) => Some(bootstrap_db(self.env, kind).await?),
            None => None,
        };
        Ok(AppState {
            db,
            video: self.video,
            game_config: self.game_config,
        })
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
