//! Pure scoring: rule table, raw-score normalization and uma allocation.
//!
//! Nothing in this module touches storage; [`normalize`] is the boundary
//! between raw command-layer tokens and the ledger.

mod error;
mod normalize;
mod rules;

pub use error::ScoreError;
pub use normalize::{GameResult, RankedSeat, normalize};
pub use rules::{RuleSet, SEATS};
