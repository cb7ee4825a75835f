//! Vote repository functions for domain layer.

use std::collections::BTreeMap;

use sea_orm::ConnectionTrait;

use crate::adapters::votes_sea as votes_adapter;
use crate::domain::tally_votes;
use crate::entities::votes;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub id: i64,
    pub session_id: i64,
    pub submission_id: i64,
    pub round_id: i64,
    pub created_at: time::OffsetDateTime,
}

impl From<votes::Model> for Vote {
    fn from(model: votes::Model) -> Self {
        Self {
            id: model.id,
            session_id: model.session_id,
            submission_id: model.submission_id,
            round_id: model.round_id,
            created_at: model.created_at,
        }
    }
}

pub async fn find_by_session_and_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    round_id: i64,
) -> Result<Option<Vote>, DomainError> {
    let vote = votes_adapter::find_by_session_and_round(conn, session_id, round_id).await?;
    Ok(vote.map(Vote::from))
}

pub async fn create_vote<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    session_id: i64,
    submission_id: i64,
    round_id: i64,
) -> Result<Vote, DomainError> {
    let dto = votes_adapter::VoteCreate {
        session_id,
        submission_id,
        round_id,
    };
    let vote = votes_adapter::create_vote(conn, dto).await?;
    Ok(Vote::from(vote))
}

/// Vote counts keyed by submission id for the given rounds, recomputed
/// from the vote rows on every call.
pub async fn tally_for_rounds<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_ids: &[i64],
) -> Result<BTreeMap<i64, u32>, DomainError> {
    let ids = votes_adapter::voted_submission_ids(conn, round_ids).await?;
    Ok(tally_votes(ids))
}
