//! Convenient re-exports for common usage patterns.
//!
//! # Example
//!
//! ```ignore
//! use riichi_ledger::prelude::*;
//!
//! let store = LedgerStore::init(".riichi-ledger")?;
//! store.record_game("game-1", &tokens, &RuleSet::default())?;
//! let top = store.lb_adjusted_total(10)?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Scoring types
pub use crate::score::{GameResult, RankedSeat, RuleSet, SEATS, ScoreError, normalize};

// Ledger types (requires "store" feature)
#[cfg(feature = "store")]
pub use crate::ledger::{
    GameRecord, LeaderboardEntry, LedgerExport, LedgerStore, OpponentDelta, PlayerAggregate,
    PlayerProfile, Seat, StoreError, VerifyReport,
};
