use std::str::FromStr;
use std::sync::Arc;

use crate::error::AppError;
use crate::video_gen::{FakeVideoGenerator, RunwareClient, RunwareConfig, VideoGenerator};

/// Which `VideoGenerator` the server injects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoGeneratorKind {
    #[default]
    Runware,
    Fake,
}

impl FromStr for VideoGeneratorKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "runware" => Ok(Self::Runware),
            "fake" => Ok(Self::Fake),
            other => Err(AppError::config(format!(
                "unknown VIDEO_GENERATOR '{other}' (expected runware | fake)"
            ))),
        }
    }
}

impl VideoGeneratorKind {
    pub fn from_env() -> Result<Self, AppError> {
        super::env_or("VIDEO_GENERATOR", Self::default())
    }

    /// Construct the generator for this kind from the environment.
    pub fn build(self) -> Result<Arc<dyn VideoGenerator>, AppError> {
        match self {
            Self::Fake => Ok(Arc::new(FakeVideoGenerator::succeeding())),
            Self::Runware => {
                let config = RunwareConfig::from_env().map_err(|e| AppError::config(e.to_string()))?;
                let client = RunwareClient::new(config).map_err(|e| AppError::config(e.to_string()))?;
                Ok(Arc::new(client))
            }
        }
    }
}
