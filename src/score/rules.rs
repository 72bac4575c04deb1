//! Scoring rule table.

/// Number of seats in a game. Every game has exactly four players.
pub const SEATS: usize = 4;

/// Rule table for score adjustment.
///
/// `starting_stake` is the per-player starting points (the oka buy-in is
/// folded into this subtraction). `uma` holds the per-placement bonus in
/// score-thousands, best placement first.
///
/// The table is a construction parameter rather than a module constant so
/// alternate rule sets don't require a recompile. The uma split for tied
/// players is integer division of the pooled uma (times 1000); with the
/// default table every possible tied run divides evenly. Custom tables that
/// break this property truncate the share toward zero, and adjusted scores
/// for that game may not sum to exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    /// Starting points per player (default 25000).
    pub starting_stake: i64,

    /// Placement bonus in score-thousands, placements 1..4.
    pub uma: [i64; SEATS],
}

impl RuleSet {
    /// Combined starting points across the table; valid raw scores sum to this.
    pub fn stake_total(&self) -> i64 {
        self.starting_stake * SEATS as i64
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            starting_stake: 25000,
            uma: [15, 5, -5, -15],
        }
    }
}
