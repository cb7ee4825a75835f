//! Repository functions for the domain layer.

pub mod games;
pub mod rounds;
pub mod sessions;
pub mod submissions;
pub mod videos;
pub mod votes;
