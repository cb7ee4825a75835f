pub mod error_shape;
pub mod extractors;
pub mod game_handlers;
