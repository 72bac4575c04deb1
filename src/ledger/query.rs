//! Read-only projections: leaderboards, profiles and head-to-head deltas.
//!
//! Everything here reads a snapshot of the aggregate table (leaderboards,
//! profiles) or the ledger itself (opponent deltas); nothing mutates state
//! and nothing blocks writers. Division by `game_total` is safe because a
//! player row only exists once the player has at least one game.

use std::collections::BTreeMap;

use serde::Serialize;

use super::error::StoreError;
use super::store::LedgerStore;
use super::types::PlayerAggregate;

/// One leaderboard row. Totals are whole numbers; averages are fractional.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub player_id: String,
    pub value: f64,
}

/// A single player's totals plus the derived averages.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerProfile {
    pub player_id: String,
    pub score_raw_total: i64,
    pub score_adj_total: i64,
    pub rank_total: u64,
    pub game_total: u64,
    pub raw_average: f64,
    pub adj_average: f64,
    pub placement_average: f64,
}

impl PlayerProfile {
    fn from_aggregate(row: PlayerAggregate) -> Self {
        let games = row.game_total as f64;
        Self {
            raw_average: row.score_raw_total as f64 / games,
            adj_average: row.score_adj_total as f64 / games,
            placement_average: row.rank_total as f64 / games,
            player_id: row.player_id,
            score_raw_total: row.score_raw_total,
            score_adj_total: row.score_adj_total,
            rank_total: row.rank_total,
            game_total: row.game_total,
        }
    }
}

/// Head-to-head totals against one opponent across all shared games.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpponentDelta {
    pub opponent_id: String,
    /// Sum of (player raw - opponent raw) over shared games.
    pub raw_delta: i64,
    /// Sum of (player adj - opponent adj) over shared games.
    pub adj_delta: i64,
    pub shared_games: u64,
}

impl LedgerStore {
    /// Leaderboard by average placement, best (lowest) first.
    pub fn lb_average_placement(&self, n: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        self.leaderboard(n, true, |p| p.rank_total as f64 / p.game_total as f64)
    }

    /// Leaderboard by total adjusted score, highest first.
    pub fn lb_adjusted_total(&self, n: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        self.leaderboard(n, false, |p| p.score_adj_total as f64)
    }

    /// Leaderboard by total raw score, highest first.
    pub fn lb_raw_total(&self, n: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        self.leaderboard(n, false, |p| p.score_raw_total as f64)
    }

    /// Leaderboard by average adjusted score per game, highest first.
    pub fn lb_adjusted_average(&self, n: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        self.leaderboard(n, false, |p| {
            p.score_adj_total as f64 / p.game_total as f64
        })
    }

    /// Leaderboard by average raw score per game, highest first.
    pub fn lb_raw_average(&self, n: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        self.leaderboard(n, false, |p| {
            p.score_raw_total as f64 / p.game_total as f64
        })
    }

    /// Leaderboard by games played, most first.
    pub fn lb_games_played(&self, n: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        self.leaderboard(n, false, |p| p.game_total as f64)
    }

    /// A player's totals and derived averages, if they have played.
    pub fn player_profile(&self, player_id: &str) -> Result<Option<PlayerProfile>, StoreError> {
        Ok(self.player(player_id)?.map(PlayerProfile::from_aggregate))
    }

    /// Head-to-head deltas against every opponent ever seated with the
    /// player, sorted by opponent id. Scans the ledger, not the aggregates.
    pub fn opponent_deltas(&self, player_id: &str) -> Result<Vec<OpponentDelta>, StoreError> {
        let mut deltas: BTreeMap<String, OpponentDelta> = BTreeMap::new();
        for game in self.all_games()? {
            let Some(own) = game.seats.iter().find(|s| s.player_id == player_id) else {
                continue;
            };
            for seat in game.seats.iter().filter(|s| s.player_id != player_id) {
                let entry = deltas
                    .entry(seat.player_id.clone())
                    .or_insert_with(|| OpponentDelta {
                        opponent_id: seat.player_id.clone(),
                        raw_delta: 0,
                        adj_delta: 0,
                        shared_games: 0,
                    });
                entry.raw_delta += own.score_raw - seat.score_raw;
                entry.adj_delta += own.score_adj - seat.score_adj;
                entry.shared_games += 1;
            }
        }
        Ok(deltas.into_values().collect())
    }

    /// 1-based position of the player when everyone is ordered by total
    /// adjusted score descending. Competition ranking: tied totals share a
    /// rank (1 + count of strictly greater totals).
    pub fn rank_by_adjusted_total(&self, player_id: &str) -> Result<Option<u64>, StoreError> {
        let players = self.all_players()?;
        let Some(own) = players.iter().find(|p| p.player_id == player_id) else {
            return Ok(None);
        };
        let above = players
            .iter()
            .filter(|p| p.score_adj_total > own.score_adj_total)
            .count() as u64;
        Ok(Some(above + 1))
    }

    fn leaderboard<F>(
        &self,
        n: usize,
        ascending: bool,
        metric: F,
    ) -> Result<Vec<LeaderboardEntry>, StoreError>
    where
        F: Fn(&PlayerAggregate) -> f64,
    {
        let mut entries: Vec<LeaderboardEntry> = self
            .all_players()?
            .iter()
            .map(|p| LeaderboardEntry {
                player_id: p.player_id.clone(),
                value: metric(p),
            })
            .collect();
        // Stable sort: ties keep player-id key order.
        if ascending {
            entries.sort_by(|a, b| a.value.total_cmp(&b.value));
        } else {
            entries.sort_by(|a, b| b.value.total_cmp(&a.value));
        }
        entries.truncate(n);
        Ok(entries)
    }
}
