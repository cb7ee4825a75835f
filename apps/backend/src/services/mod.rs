pub mod game_flow;
pub mod round_clock;
pub mod videos;
