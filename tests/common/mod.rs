//! Common test utilities and fixtures.

#![cfg(feature = "store")]

use riichi_ledger::prelude::*;
use tempfile::TempDir;

/// A fresh ledger store in a temporary directory.
///
/// The `TempDir` must stay alive for as long as the store is used.
pub fn temp_store() -> (TempDir, LedgerStore) {
    let dir = TempDir::new().unwrap();
    let store = LedgerStore::init(dir.path()).unwrap();
    (dir, store)
}

/// Flatten (player id, raw score) pairs into the 8-token input form.
pub fn tokens(pairs: &[(&str, i64)]) -> Vec<String> {
    pairs
        .iter()
        .flat_map(|(id, score)| [id.to_string(), score.to_string()])
        .collect()
}

/// Normalize and append a game under the default rule table.
pub fn record(store: &LedgerStore, game_id: &str, pairs: &[(&str, i64)]) -> GameRecord {
    store
        .record_game(game_id, &tokens(pairs), &RuleSet::default())
        .unwrap()
}

/// A clean sweep: alice 1st through dave 4th.
pub const BASIC_GAME: [(&str, i64); 4] = [
    ("alice", 40000),
    ("bob", 30000),
    ("carol", 20000),
    ("dave", 10000),
];
