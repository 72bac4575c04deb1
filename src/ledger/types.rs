//! Row types for the ledger and aggregate tables.

use serde::{Deserialize, Serialize};

use crate::score::GameResult;

/// One persisted seat of a game, placement implied by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player_id: String,
    pub score_raw: i64,
    pub score_adj: i64,
}

/// One immutable ledger row: a finished, normalized game.
///
/// Seats are stored in descending raw-score order exactly as the normalizer
/// produced them, so the first seat is the winner. Raw scores sum to the
/// rule table's stake total and adjusted scores sum to zero. Rows are never
/// mutated or deleted once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: String,
    /// Milliseconds since the Unix epoch, stamped at append time.
    pub timestamp_ms: u64,
    /// Exactly four seats, winner first.
    pub seats: Vec<Seat>,
}

impl GameRecord {
    pub(crate) fn new(game_id: &str, timestamp_ms: u64, result: &GameResult) -> Self {
        Self {
            game_id: game_id.to_string(),
            timestamp_ms,
            seats: result
                .seats
                .iter()
                .map(|s| Seat {
                    player_id: s.player_id.clone(),
                    score_raw: s.score_raw,
                    score_adj: s.score_adj,
                })
                .collect(),
        }
    }
}

/// One mutable aggregate row: a player's running totals over the ledger.
///
/// Logically a fold of every [`GameRecord`] mentioning the player; the
/// reconciliation pass recomputes that fold and diffs it against these rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAggregate {
    pub player_id: String,
    /// Sum of raw points across all games.
    pub score_raw_total: i64,
    /// Sum of zero-sum adjusted points across all games.
    pub score_adj_total: i64,
    /// Sum of 1-based placements across all games.
    pub rank_total: u64,
    /// Number of games played.
    pub game_total: u64,
}

impl PlayerAggregate {
    /// Fresh row for a player's first appearance, all totals zero.
    pub(crate) fn new(player_id: &str) -> Self {
        Self {
            player_id: player_id.to_string(),
            score_raw_total: 0,
            score_adj_total: 0,
            rank_total: 0,
            game_total: 0,
        }
    }

    /// Fold one seat into the running totals.
    pub(crate) fn apply(&mut self, seat: &Seat, placement: u8) {
        self.score_raw_total += seat.score_raw;
        self.score_adj_total += seat.score_adj;
        self.rank_total += u64::from(placement);
        self.game_total += 1;
    }
}

/// Full dump of both tables for offline audit or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerExport {
    pub games: Vec<GameRecord>,
    pub players: Vec<PlayerAggregate>,
}
