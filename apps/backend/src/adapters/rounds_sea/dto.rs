//! DTOs for rounds_sea adapter.

/// DTO for creating a new round.
#[derive(Debug, Clone)]
pub struct RoundCreate {
    pub game_id: i64,
    pub round_number: i16,
    pub content: String,
}
