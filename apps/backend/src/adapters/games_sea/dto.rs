//! DTOs for games_sea adapter.

/// DTO for creating a new game.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub name: String,
}

impl GameCreate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Compare-and-swap of `current_round`; applies only while the game is
/// active and still at `expected_round`.
#[derive(Debug, Clone, Copy)]
pub struct RoundSwap {
    pub game_id: i64,
    pub expected_round: i16,
    pub next_round: i16,
}

impl RoundSwap {
    pub fn advance_from(game_id: i64, expected_round: i16) -> Self {
        Self {
            game_id,
            expected_round,
            next_round: expected_round + 1,
        }
    }
}
