//! Domain layer: pure game rules, no I/O.

pub mod rules;
pub mod tally;

pub use rules::{Role, DEFAULT_MAX_ROUNDS, DEFAULT_ROUND_DURATION, MAX_PLAYERS};
pub use tally::{standings, tally_votes, winners, Standing};
