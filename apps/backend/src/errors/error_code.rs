//! Error codes for the QuipReel API.
//!
//! Every code that can appear in a Problem Details body lives here.
//! Add new codes here; never pass ad-hoc strings as error codes.

use core::fmt;

/// Canonical error codes, rendered as SCREAMING_SNAKE_CASE in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    /// General validation error
    ValidationError,
    /// Malformed request body or parameters
    BadRequest,
    /// Game id missing, unparsable or not positive
    InvalidGameId,
    /// Session id unparsable or not positive
    InvalidSessionId,
    /// No session cookie or header on a session-scoped call
    SessionRequired,

    // Roles
    /// Voters may not submit prompts
    NotAPlayer,

    // Resource not found
    GameNotFound,
    SessionNotFound,
    RoundNotFound,
    SubmissionNotFound,
    VideoNotFound,
    /// Generic DB-driven not found
    NotFound,

    // Game state
    /// Game has ended
    GameInactive,
    /// The session already voted this round
    AlreadyVoted,
    /// The session already submitted this round
    AlreadySubmitted,
    /// No rounds left to advance into
    MaxRoundsReached,
    /// Another request advanced the round first
    RoundAdvanceConflict,
    /// The round advanced while the submission's video was generating
    RoundClosed,
    /// Two joins raced for the same player slot
    PlayerSlotTaken,
    /// Generic conflict (fallback for unmatched unique violations)
    Conflict,

    // Video generation
    /// The video service reported an error or returned nothing usable
    GenerationFailed,
    /// The video service did not answer in time
    GenerationTimeout,

    // System
    DbError,
    DbUnavailable,
    DbTimeout,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidGameId => "INVALID_GAME_ID",
            Self::InvalidSessionId => "INVALID_SESSION_ID",
            Self::SessionRequired => "SESSION_REQUIRED",

            Self::NotAPlayer => "NOT_A_PLAYER",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::RoundNotFound => "ROUND_NOT_FOUND",
            Self::SubmissionNotFound => "SUBMISSION_NOT_FOUND",
            Self::VideoNotFound => "VIDEO_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::GameInactive => "GAME_INACTIVE",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::AlreadySubmitted => "ALREADY_SUBMITTED",
            Self::MaxRoundsReached => "MAX_ROUNDS_REACHED",
            Self::RoundAdvanceConflict => "ROUND_ADVANCE_CONFLICT",
            Self::RoundClosed => "ROUND_CLOSED",
            Self::PlayerSlotTaken => "PLAYER_SLOT_TAKEN",
            Self::Conflict => "CONFLICT",

            Self::GenerationFailed => "GENERATION_FAILED",
            Self::GenerationTimeout => "GENERATION_TIMEOUT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
