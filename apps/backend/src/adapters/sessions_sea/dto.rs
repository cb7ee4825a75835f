//! DTOs for sessions_sea adapter.

#[derive(Debug, Clone)]
pub struct SessionCreate {
    pub game_id: i64,
    pub display_name: String,
    pub avatar: String,
    /// `Some(slot)` for players, `None` for voters.
    pub player_slot: Option<i16>,
}
