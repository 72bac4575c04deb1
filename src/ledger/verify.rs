//! Reconciliation: recompute the aggregate fold from the ledger and diff.
//!
//! The aggregate table is a running fold over the ledger; this pass redoes
//! that fold from scratch and reports where the stored rows disagree. It is
//! deliberately a full scan-and-sum, not an incremental check: the
//! incremental fold is exactly what is under suspicion. Nothing is
//! repaired; the caller decides what to do with a dirty report.

use std::collections::HashMap;

use serde::Serialize;

use crate::logging::{info, warn};

use super::error::StoreError;
use super::store::LedgerStore;
use super::types::PlayerAggregate;

/// Outcome of a reconciliation pass.
///
/// The four mismatch counters are independent: one player whose stored row
/// disagrees in raw total and game count contributes to two counters.
/// Players present on only one side (a ledger fold with no stored row, or a
/// stored row no ledger game mentions) are diffed against an all-zero row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Players whose stored `score_raw_total` disagrees with the fold.
    pub raw_mismatches: u64,
    /// Players whose stored `score_adj_total` disagrees with the fold.
    pub adj_mismatches: u64,
    /// Players whose stored `rank_total` disagrees with the fold.
    pub rank_mismatches: u64,
    /// Players whose stored `game_total` disagrees with the fold.
    pub game_mismatches: u64,
    /// Ledger rows scanned.
    pub games_scanned: u64,
    /// Stored aggregate rows scanned.
    pub players_scanned: u64,
}

impl VerifyReport {
    /// True when every stored row matches the recomputed fold.
    pub fn is_clean(&self) -> bool {
        self.raw_mismatches == 0
            && self.adj_mismatches == 0
            && self.rank_mismatches == 0
            && self.game_mismatches == 0
    }
}

impl LedgerStore {
    /// Recompute every player's totals from the ledger and diff them
    /// against the stored aggregate rows.
    pub fn verify(&self) -> Result<VerifyReport, StoreError> {
        let games = self.all_games()?;

        let mut scratch: HashMap<String, PlayerAggregate> = HashMap::new();
        for game in &games {
            for (i, seat) in game.seats.iter().enumerate() {
                scratch
                    .entry(seat.player_id.clone())
                    .or_insert_with(|| PlayerAggregate::new(&seat.player_id))
                    .apply(seat, (i + 1) as u8);
            }
        }

        let stored_rows = self.all_players()?;
        let mut report = VerifyReport {
            games_scanned: games.len() as u64,
            players_scanned: stored_rows.len() as u64,
            ..VerifyReport::default()
        };

        let mut stored: HashMap<String, PlayerAggregate> = stored_rows
            .into_iter()
            .map(|p| (p.player_id.clone(), p))
            .collect();

        let mut ids: Vec<String> = scratch.keys().chain(stored.keys()).cloned().collect();
        ids.sort();
        ids.dedup();

        for id in ids {
            let expected = scratch
                .remove(&id)
                .unwrap_or_else(|| PlayerAggregate::new(&id));
            let actual = stored
                .remove(&id)
                .unwrap_or_else(|| PlayerAggregate::new(&id));

            if expected.score_raw_total != actual.score_raw_total {
                report.raw_mismatches += 1;
            }
            if expected.score_adj_total != actual.score_adj_total {
                report.adj_mismatches += 1;
            }
            if expected.rank_total != actual.rank_total {
                report.rank_mismatches += 1;
            }
            if expected.game_total != actual.game_total {
                report.game_mismatches += 1;
            }
            if expected != actual {
                warn!(player_id = %id, "aggregate row diverges from ledger fold");
            }
        }

        info!(
            games_scanned = report.games_scanned,
            players_scanned = report.players_scanned,
            clean = report.is_clean(),
            "reconciliation finished"
        );
        Ok(report)
    }
}
