//! DTOs for votes_sea adapter.

#[derive(Debug, Clone, Copy)]
pub struct VoteCreate {
    pub session_id: i64,
    pub submission_id: i64,
    pub round_id: i64,
}
