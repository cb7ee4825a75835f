pub mod game_rounds;
pub mod games;
pub mod sessions;
pub mod submissions;
pub mod videos;
pub mod votes;

pub use game_rounds::Entity as GameRounds;
pub use games::Entity as Games;
pub use sessions::Entity as Sessions;
pub use submissions::Entity as Submissions;
pub use videos::Entity as Videos;
pub use votes::Entity as Votes;
