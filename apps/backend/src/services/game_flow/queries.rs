use sea_orm::ConnectionTrait;

use super::{GameFlowService, GameResults, GameStatus, RoundResults};
use crate::domain::rules::round_deadline;
use crate::domain::{standings, winners};
use crate::error::AppError;
use crate::repos::{games, rounds, sessions, submissions, votes};

impl GameFlowService {
    /// Pure read; never advances rounds.
    pub async fn status<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        game_id: i64,
    ) -> Result<GameStatus, AppError> {
        let game = games::require_game(conn, game_id).await?;
        let latest_round = rounds::find_latest(conn, game_id).await?;
        let round_count = rounds::count_by_game(conn, game_id).await?;
        let round_deadline = latest_round
            .as_ref()
            .map(|r| round_deadline(r.created_at, self.config.round_duration));

        Ok(GameStatus {
            game,
            latest_round,
            round_count,
            max_rounds: self.config.max_rounds,
            round_deadline,
        })
    }

    /// Latest round, its submissions and the vote tally.
    pub async fn round_results<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        game_id: i64,
    ) -> Result<RoundResults, AppError> {
        games::require_game(conn, game_id).await?;
        let round = rounds::require_latest(conn, game_id).await?;
        let submissions = submissions::find_all_by_round(conn, round.id).await?;
        let votes = votes::tally_for_rounds(conn, &[round.id]).await?;

        Ok(RoundResults {
            round,
            submissions,
            votes,
        })
    }

    /// Every round with tallies, plus standings and winners for the game.
    pub async fn game_results<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        game_id: i64,
    ) -> Result<GameResults, AppError> {
        let game = games::require_game(conn, game_id).await?;
        let all_rounds = rounds::find_all_by_game(conn, game_id).await?;
        let all_submissions = submissions::find_all_by_game(conn, game_id).await?;
        let round_ids: Vec<i64> = all_rounds.iter().map(|r| r.id).collect();
        let tally = votes::tally_for_rounds(conn, &round_ids).await?;

        let pairs: Vec<(i64, i64)> = all_submissions
            .iter()
            .map(|s| (s.id, s.session_id))
            .collect();
        let table = standings(&pairs, &tally);
        let winners = winners(&table);

        let rounds = all_rounds
            .into_iter()
            .map(|round| {
                let subs: Vec<_> = all_submissions
                    .iter()
                    .filter(|s| s.round_id == round.id)
                    .cloned()
                    .collect();
                let votes = subs
                    .iter()
                    .filter_map(|s| tally.get(&s.id).map(|n| (s.id, *n)))
                    .collect();
                RoundResults {
                    round,
                    submissions: subs,
                    votes,
                }
            })
            .collect();

        Ok(GameResults {
            game,
            rounds,
            sessions: sessions::find_all_by_game(conn, game_id).await?,
            standings: table,
            winners,
        })
    }
}
