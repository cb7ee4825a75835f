use std::fmt;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::game::GameConfig;
use crate::error::AppError;
use crate::services::game_flow::GameFlowService;
use crate::video_gen::VideoGenerator;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Injected video generator; `None` when prompt submission is disabled
    pub video: Option<Arc<dyn VideoGenerator>>,
    pub game_config: GameConfig,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("video", &self.video.as_ref().map(|v| v.name().to_string()))
            .field("game_config", &self.game_config)
            .finish()
    }
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        video: Arc<dyn VideoGenerator>,
        game_config: GameConfig,
    ) -> Self {
        Self {
            db: Some(db),
            video: Some(video),
            game_config,
        }
    }

    /// State without a database or generator (extractor and error tests).
    pub fn without_db(game_config: GameConfig) -> Self {
        Self {
            db: None,
            video: None,
            game_config,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    pub fn require_video(&self) -> Result<Arc<dyn VideoGenerator>, AppError> {
        self.video
            .clone()
            .ok_or_else(|| AppError::config("no video generator configured"))
    }

    pub fn game_flow(&self) -> GameFlowService {
        GameFlowService::new(self.game_config.clone())
    }
}
