pub mod game_id;
pub mod session_id;
pub mod validated_json;

pub use game_id::GameId;
pub use session_id::SessionId;
pub use validated_json::{Validate, ValidatedJson};

/// Cookie names set by `POST /api/game/join`.
pub const SESSION_COOKIE: &str = "sessionId";
pub const GAME_COOKIE: &str = "gameId";
/// Header fallback for clients that cannot keep cookies.
pub const SESSION_HEADER: &str = "x-session-id";
