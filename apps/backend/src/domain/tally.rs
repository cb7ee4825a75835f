//! Vote tallies and standings. Counts are always derived from vote rows,
//! never stored.

use std::collections::BTreeMap;

/// Votes per submission id. Submissions without votes are absent.
pub fn tally_votes<I>(voted_submission_ids: I) -> BTreeMap<i64, u32>
where
    I: IntoIterator<Item = i64>,
{
    let mut counts = BTreeMap::new();
    for submission_id in voted_submission_ids {
        *counts.entry(submission_id).or_insert(0) += 1;
    }
    counts
}

/// Total votes received by one session across all of its submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub session_id: i64,
    pub votes: u32,
}

/// Standings for every session that submitted, highest first, ties by session id.
///
/// `submissions` holds `(submission_id, session_id)` pairs.
pub fn standings(submissions: &[(i64, i64)], tally: &BTreeMap<i64, u32>) -> Vec<Standing> {
    let mut totals: BTreeMap<i64, u32> = BTreeMap::new();
    for (submission_id, session_id) in submissions {
        let votes = tally.get(submission_id).copied().unwrap_or(0);
        *totals.entry(*session_id).or_insert(0) += votes;
    }

    let mut out: Vec<Standing> = totals
        .into_iter()
        .map(|(session_id, votes)| Standing { session_id, votes })
        .collect();
    out.sort_by(|a, b| b.votes.cmp(&a.votes).then(a.session_id.cmp(&b.session_id)));
    out
}

/// Sessions tied at the highest non-zero total; empty when nobody got a vote.
pub fn winners(standings: &[Standing]) -> Vec<i64> {
    let Some(top) = standings.iter().map(|s| s.votes).max() else {
        return Vec::new();
    };
    if top == 0 {
        return Vec::new();
    }
    standings
        .iter()
        .filter(|s| s.votes == top)
        .map(|s| s.session_id)
        .collect()
}
