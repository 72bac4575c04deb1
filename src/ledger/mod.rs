//! Persistent ledger and aggregate stores.
//!
//! Two tables over one fjall database: an append-only `games` keyspace (the
//! single source of truth) and a derived `players` keyspace of running
//! totals, plus the read-only query layer and the reconciliation pass that
//! checks the two against each other.

mod error;
pub mod format;
mod query;
mod store;
mod types;
mod verify;

pub use error::StoreError;
pub use query::{LeaderboardEntry, OpponentDelta, PlayerProfile};
pub use store::LedgerStore;
pub use types::{GameRecord, LedgerExport, PlayerAggregate, Seat};
pub use verify::VerifyReport;
