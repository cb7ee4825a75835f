use std::ops::RangeInclusive;
use std::time::Duration;

use time::OffsetDateTime;

use crate::errors::domain::DomainError;

/// Sessions that may submit prompts; everyone after them votes.
pub const MAX_PLAYERS: usize = 2;
pub const DEFAULT_MAX_ROUNDS: i16 = 3;
pub const DEFAULT_ROUND_DURATION: Duration = Duration::from_secs(60);

pub const DISPLAY_NAME_LEN: RangeInclusive<usize> = 1..=32;
pub const PROMPT_LEN: RangeInclusive<usize> = 1..=500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Player,
    Voter,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::Voter => "voter",
        }
    }
}

/// Role for the next session to join, given how many players already joined.
pub fn role_for_next_join(player_count: usize) -> Role {
    if player_count < MAX_PLAYERS {
        Role::Player
    } else {
        Role::Voter
    }
}

/// Lowest free 1-based player slot, or `None` when both are taken.
pub fn next_player_slot(taken: &[i16]) -> Option<i16> {
    (1..=MAX_PLAYERS as i16).find(|slot| !taken.contains(slot))
}

pub fn round_deadline(round_started: OffsetDateTime, round_duration: Duration) -> OffsetDateTime {
    round_started + round_duration
}

/// True once the round has been open for at least `round_duration`.
pub fn round_is_due(round_started: OffsetDateTime, now: OffsetDateTime, round_duration: Duration) -> bool {
    now >= round_deadline(round_started, round_duration)
}

pub fn can_advance(current_round: i16, max_rounds: i16) -> bool {
    current_round < max_rounds
}

fn trimmed_within(
    raw: &str,
    field: &str,
    bounds: RangeInclusive<usize>,
) -> Result<String, DomainError> {
    let value = raw.trim();
    let len = value.chars().count();
    if !bounds.contains(&len) {
        return Err(DomainError::validation(format!(
            "{field} must be between {} and {} characters",
            bounds.start(),
            bounds.end()
        )));
    }
    Ok(value.to_string())
}

pub fn normalize_display_name(raw: &str) -> Result<String, DomainError> {
    trimmed_within(raw, "name", DISPLAY_NAME_LEN)
}

pub fn normalize_prompt(raw: &str) -> Result<String, DomainError> {
    trimmed_within(raw, "content", PROMPT_LEN)
}
