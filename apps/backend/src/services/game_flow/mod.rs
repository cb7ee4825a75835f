//! Game/round orchestration - bridges the pure rules in `domain` with
//! persistence in `repos`.
//!
//! Every method is generic over `ConnectionTrait` so callers decide the
//! transaction boundary (`with_txn` in handlers, one txn per game in the
//! round clock, a rolled-back txn in tests).

mod lobby;
mod queries;
mod round_lifecycle;
mod submissions;
mod voting;

use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::config::game::GameConfig;
use crate::domain::Standing;
use crate::repos::games::Game;
use crate::repos::rounds::Round;
use crate::repos::sessions::Session;
use crate::repos::submissions::Submission;

pub use submissions::PreparedSubmission;

/// Game flow service. Holds only pacing configuration; the video
/// generator is passed to the submit path by the caller.
#[derive(Debug, Clone, Default)]
pub struct GameFlowService {
    config: GameConfig,
}

impl GameFlowService {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCreated {
    pub game: Game,
    pub round: Round,
}

/// Result of the advance-if-due command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Advanced(Round),
    NotDue,
}

/// Read-only view of a game for polling clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStatus {
    pub game: Game,
    pub latest_round: Option<Round>,
    pub round_count: u64,
    pub max_rounds: i16,
    /// When the round clock will advance the latest round.
    pub round_deadline: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResults {
    pub round: Round,
    pub submissions: Vec<Submission>,
    /// Votes per submission id; submissions without votes are absent.
    pub votes: BTreeMap<i64, u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResults {
    pub game: Game,
    pub rounds: Vec<RoundResults>,
    pub sessions: Vec<Session>,
    pub standings: Vec<Standing>,
    pub winners: Vec<i64>,
}
