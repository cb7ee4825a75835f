//! SeaORM adapters: query functions generic over `ConnectionTrait`,
//! returning `sea_orm::DbErr`.

pub mod games_sea;
pub mod rounds_sea;
pub mod sessions_sea;
pub mod submissions_sea;
pub mod videos_sea;
pub mod votes_sea;
