//! Wire types for `/api/game`. Field names are camelCase.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::rules::{normalize_display_name, normalize_prompt};
use crate::domain::Standing;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::game_id::parse_game_id;
use crate::extractors::Validate;
use crate::repos::games::Game;
use crate::repos::rounds::Round;
use crate::repos::sessions::Session;
use crate::repos::submissions::Submission;
use crate::repos::votes::Vote;
use crate::services::game_flow::{GameResults, GameStatus, RoundResults};

/// Game id as clients send it: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawGameId {
    Number(i64),
    Text(String),
}

impl RawGameId {
    pub fn resolve(&self) -> Result<i64, AppError> {
        match self {
            RawGameId::Number(n) => parse_game_id(&n.to_string()),
            RawGameId::Text(s) => parse_game_id(s),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRef {
    pub game_id: Option<RawGameId>,
}

impl GameRef {
    pub fn game_id(&self) -> Result<i64, AppError> {
        self.game_id
            .as_ref()
            .ok_or_else(|| AppError::bad_request(ErrorCode::InvalidGameId, "gameId is required"))?
            .resolve()
    }
}

impl Validate for GameRef {
    fn validate(&self) -> Result<(), AppError> {
        self.game_id().map(|_| ())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub game_id: Option<RawGameId>,
    #[serde(default)]
    pub name: String,
    pub avatar: Option<String>,
}

impl JoinRequest {
    pub fn game_id(&self) -> Result<i64, AppError> {
        GameRef {
            game_id: self.game_id.clone(),
        }
        .game_id()
    }
}

impl Validate for JoinRequest {
    fn validate(&self) -> Result<(), AppError> {
        self.game_id()?;
        normalize_display_name(&self.name)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub content: String,
}

impl Validate for SubmitRequest {
    fn validate(&self) -> Result<(), AppError> {
        normalize_prompt(&self.content)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub submission_id: i64,
}

impl Validate for VoteRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.submission_id <= 0 {
            return Err(AppError::invalid(
                ErrorCode::ValidationError,
                "submissionId: must be positive",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDto {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub current_round: i16,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
}

impl From<Game> for GameDto {
    fn from(g: Game) -> Self {
        Self {
            id: g.id,
            name: g.name,
            is_active: g.is_active,
            current_round: g.current_round,
            created_at: g.created_at,
            ended_at: g.ended_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundDto {
    pub id: i64,
    pub game_id: i64,
    pub round_number: i16,
    pub topic: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Round> for RoundDto {
    fn from(r: Round) -> Self {
        Self {
            id: r.id,
            game_id: r.game_id,
            round_number: r.round_number,
            topic: r.topic,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: i64,
    pub game_id: i64,
    pub display_name: String,
    pub role: &'static str,
    pub is_player: bool,
    pub player_slot: Option<i16>,
    pub avatar: String,
}

impl From<Session> for SessionDto {
    fn from(s: Session) -> Self {
        Self {
            id: s.id,
            game_id: s.game_id,
            is_player: s.is_player(),
            role: s.role.as_str(),
            display_name: s.display_name,
            player_slot: s.player_slot,
            avatar: s.avatar,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDto {
    pub id: i64,
    pub session_id: i64,
    pub round_id: i64,
    pub content: String,
    pub result_url: Option<String>,
    #[serde(rename = "videoTaskUUID")]
    pub video_task_uuid: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Submission> for SubmissionDto {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            session_id: s.session_id,
            round_id: s.round_id,
            content: s.content,
            result_url: s.result_url,
            video_task_uuid: s.video_task_uuid,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteDto {
    pub id: i64,
    pub session_id: i64,
    pub submission_id: i64,
    pub round_id: i64,
}

impl From<Vote> for VoteDto {
    fn from(v: Vote) -> Self {
        Self {
            id: v.id,
            session_id: v.session_id,
            submission_id: v.submission_id,
            round_id: v.round_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameResponse {
    pub game: GameDto,
    pub round: RoundDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceIfDueResponse {
    pub advanced: bool,
    pub round: Option<RoundDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndGameResponse {
    pub game_id: i64,
    pub ended: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub game: GameDto,
    pub is_active: bool,
    pub latest_round: Option<RoundDto>,
    pub round_count: u64,
    pub max_rounds: i16,
    #[serde(with = "time::serde::rfc3339::option")]
    pub round_deadline: Option<OffsetDateTime>,
}

impl From<GameStatus> for StatusResponse {
    fn from(s: GameStatus) -> Self {
        Self {
            is_active: s.game.is_active,
            game: s.game.into(),
            latest_round: s.latest_round.map(Into::into),
            round_count: s.round_count,
            max_rounds: s.max_rounds,
            round_deadline: s.round_deadline,
        }
    }
}

/// Vote counts keyed by submission id. JSON object keys are strings.
fn tally_map(votes: BTreeMap<i64, u32>) -> BTreeMap<String, u32> {
    votes.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundResultsResponse {
    pub round: RoundDto,
    pub submissions: Vec<SubmissionDto>,
    pub votes: BTreeMap<String, u32>,
}

impl From<RoundResults> for RoundResultsResponse {
    fn from(r: RoundResults) -> Self {
        Self {
            round: r.round.into(),
            submissions: r.submissions.into_iter().map(Into::into).collect(),
            votes: tally_map(r.votes),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingDto {
    pub session_id: i64,
    pub votes: u32,
}

impl From<Standing> for StandingDto {
    fn from(s: Standing) -> Self {
        Self {
            session_id: s.session_id,
            votes: s.votes,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResultsResponse {
    pub game: GameDto,
    pub rounds: Vec<RoundResultsResponse>,
    pub sessions: Vec<SessionDto>,
    pub standings: Vec<StandingDto>,
    pub winners: Vec<i64>,
}

impl From<GameResults> for GameResultsResponse {
    fn from(r: GameResults) -> Self {
        Self {
            game: r.game.into(),
            rounds: r.rounds.into_iter().map(Into::into).collect(),
            sessions: r.sessions.into_iter().map(Into::into).collect(),
            standings: r.standings.into_iter().map(Into::into).collect(),
            winners: r.winners,
        }
    }
}
