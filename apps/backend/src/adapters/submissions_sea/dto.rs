//! DTOs for submissions_sea adapter.

#[derive(Debug, Clone)]
pub struct SubmissionCreate {
    pub session_id: i64,
    pub game_id: i64,
    pub round_id: i64,
    pub content: String,
    pub result_url: Option<String>,
    pub video_task_uuid: Option<String>,
}
