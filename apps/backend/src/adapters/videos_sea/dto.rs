//! DTOs for videos_sea adapter.

#[derive(Debug, Clone, PartialEq)]
pub struct VideoUpsert {
    pub task_uuid: String,
    pub video_url: String,
    pub status: String,
    pub prompt: String,
    pub model: String,
    pub width: f64,
    pub height: f64,
    pub cost: Option<f64>,
    pub seed: Option<f64>,
}
