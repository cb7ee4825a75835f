use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Generated videos reported by the provider, keyed by task UUID.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "task_uuid", unique)]
    pub task_uuid: String,
    #[sea_orm(column_name = "video_url", column_type = "Text")]
    pub video_url: String,
    pub status: String,
    #[sea_orm(column_type = "Text")]
    pub prompt: String,
    pub model: String,
    #[sea_orm(column_type = "Double")]
    pub width: f64,
    #[sea_orm(column_type = "Double")]
    pub height: f64,
    #[sea_orm(column_type = "Double", nullable)]
    pub cost: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub seed: Option<f64>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
