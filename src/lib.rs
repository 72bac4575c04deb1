//! Community score ledger for four-player riichi mahjong.
//!
//! Raw end-of-game point totals go in; ranked zero-sum adjusted scores,
//! an immutable game ledger, per-player running totals and leaderboard
//! queries come out.
//!
//! # Quick Start
//!
//! ```ignore
//! use riichi_ledger::prelude::*;
//!
//! // Initialize a ledger store
//! let store = LedgerStore::init(".riichi-ledger")?;
//!
//! // Record a game: 4 (player id, raw score) pairs, flattened
//! let tokens = ["alice", "40000", "bob", "30000", "carol", "20000", "dave", "10000"];
//! let record = store.record_game("game-1", &tokens, &RuleSet::default())?;
//!
//! // Query the leaderboard and reconcile totals against the ledger
//! let top = store.lb_adjusted_total(10)?;
//! assert!(store.verify()?.is_clean());
//! ```
//!
//! # Modules
//!
//! - [`score`] - Pure score normalization and uma allocation (always available)
//! - [`ledger`] - Append-only game ledger with derived player totals, queries
//!   and reconciliation (requires `store` feature)
//!
//! # Feature Flags
//!
//! - `store` - Enable the persistent ledger store (enabled by default)
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `cli` - Enable the command-line interface binary
//! - `full` - Enable all features

#[cfg(feature = "store")]
pub mod ledger;
mod logging;
pub mod prelude;
pub mod score;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

// Re-export scoring types at crate root for convenience
pub use score::{GameResult, RankedSeat, RuleSet, SEATS, ScoreError, normalize};

// Re-export ledger types at crate root for convenience
#[cfg(feature = "store")]
pub use ledger::{
    GameRecord, LeaderboardEntry, LedgerExport, LedgerStore, OpponentDelta, PlayerAggregate,
    PlayerProfile, Seat, StoreError, VerifyReport,
};
