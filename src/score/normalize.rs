//! Raw score normalization and uma allocation.
//!
//! Turns the eight raw tokens of a finished game (four player-id/score
//! pairs) into ranked, zero-sum adjusted scores:
//!
//! ```text
//! adjusted = raw - starting_stake + uma_share
//! ```
//!
//! Input scores may be given in points (`25000`) or in thousands shorthand
//! (`25.0`); the shorthand is detected from the sum and scaled up. Players
//! tied on raw score keep their input order and split the pooled uma of the
//! tied placements evenly, so adjusted scores always sum to zero under the
//! default rule table.

use std::cmp::Reverse;

use super::error::ScoreError;
use super::rules::{RuleSet, SEATS};

/// Largest accepted score magnitude, in points. Anything beyond this is not
/// a representable game score, and the cap keeps the milli-point sum of
/// four values well inside `i64`.
const MAX_RAW_SCORE: f64 = 1e9;

/// One ranked seat of a normalized game, best placement first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSeat {
    pub player_id: String,
    /// End-of-game points, always in points (never thousands shorthand).
    pub score_raw: i64,
    /// Zero-sum adjusted points after stake subtraction and uma.
    pub score_adj: i64,
    /// 1-based placement; tied players keep distinct consecutive placements.
    pub placement: u8,
}

/// A normalized game: exactly four seats in descending raw-score order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub seats: Vec<RankedSeat>,
}

/// Normalize raw score tokens into a ranked [`GameResult`].
///
/// `tokens` is the flattened `[id1, score1, id2, score2, id3, score3,
/// id4, score4]` form the command layer hands over. Validation happens
/// before any ranking: arity, numeric parse (finite and within
/// [`MAX_RAW_SCORE`]), then the sum check that also decides the input
/// scale.
pub fn normalize<S: AsRef<str>>(tokens: &[S], rules: &RuleSet) -> Result<GameResult, ScoreError> {
    if tokens.len() != SEATS * 2 {
        return Err(ScoreError::BadArity {
            expected: SEATS * 2,
            got: tokens.len(),
        });
    }

    // Parse into (player_id, score in milli-points). Working in rounded
    // milli-points keeps the sum comparison exact for fractional shorthand
    // like "25.5".
    let mut pairs: Vec<(String, i64)> = Vec::with_capacity(SEATS);
    for chunk in tokens.chunks_exact(2) {
        let [id, score] = chunk else { continue };
        let value: f64 = score
            .as_ref()
            .parse()
            .ok()
            .filter(|v: &f64| v.is_finite() && v.abs() <= MAX_RAW_SCORE)
            .ok_or_else(|| ScoreError::BadNumber {
                token: score.as_ref().to_string(),
            })?;
        pairs.push((id.as_ref().to_string(), (value * 1000.0).round() as i64));
    }

    let stake_total = rules.stake_total();
    let sum_milli: i64 = pairs.iter().map(|(_, v)| v).sum();

    // Scale detection: a milli-point sum equal to the stake total means the
    // input was thousands shorthand, so the milli values already are points.
    let mut seats: Vec<(String, i64)> = if sum_milli == stake_total {
        pairs
    } else if sum_milli == stake_total * 1000 {
        pairs
            .into_iter()
            .map(|(id, milli)| (id, (milli as f64 / 1000.0).round() as i64))
            .collect()
    } else {
        return Err(ScoreError::BadSum {
            expected: stake_total,
            got: sum_milli as f64 / 1000.0,
        });
    };

    // Stable sort: exact ties keep input order.
    seats.sort_by_key(|(_, raw)| Reverse(*raw));

    let raw_scores: Vec<i64> = seats.iter().map(|(_, raw)| *raw).collect();
    let shares = uma_shares(&raw_scores, &rules.uma);

    let seats = seats
        .into_iter()
        .zip(shares)
        .enumerate()
        .map(|(i, ((player_id, score_raw), share))| RankedSeat {
            player_id,
            score_raw,
            score_adj: score_raw - rules.starting_stake + share,
            placement: (i + 1) as u8,
        })
        .collect();

    Ok(GameResult { seats })
}

/// Per-seat uma share in points for descending-sorted raw scores.
///
/// Partitions the seats into maximal runs of equal raw score, pools each
/// run's uma values, and splits the pool evenly across the run. The pool is
/// multiplied by 1000 (thousands to points) before the integer division so
/// the split loses nothing whenever the run length divides the pool.
fn uma_shares(raw: &[i64], uma: &[i64; SEATS]) -> Vec<i64> {
    let mut shares = Vec::with_capacity(raw.len());
    let mut raw_rest = raw;
    let mut uma_rest: &[i64] = uma;
    while let Some(&head) = raw_rest.first() {
        let run = raw_rest.iter().take_while(|&&v| v == head).count();
        let (pool, tail) = uma_rest.split_at(run.min(uma_rest.len()));
        let share = pool.iter().sum::<i64>() * 1000 / run as i64;
        shares.extend(std::iter::repeat_n(share, run));
        raw_rest = raw_rest.get(run..).unwrap_or_default();
        uma_rest = tail;
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(result: &GameResult) -> Vec<&str> {
        result.seats.iter().map(|s| s.player_id.as_str()).collect()
    }

    fn raws(result: &GameResult) -> Vec<i64> {
        result.seats.iter().map(|s| s.score_raw).collect()
    }

    fn adjs(result: &GameResult) -> Vec<i64> {
        result.seats.iter().map(|s| s.score_adj).collect()
    }

    #[test]
    fn ranks_and_adjusts_basic_input() {
        let tokens = [
            "100004", "40000", "100003", "30000", "100002", "20000", "100001", "10000",
        ];
        let result = normalize(&tokens, &RuleSet::default()).unwrap();
        assert_eq!(ids(&result), ["100004", "100003", "100002", "100001"]);
        assert_eq!(raws(&result), [40000, 30000, 20000, 10000]);
        assert_eq!(adjs(&result), [30000, 10000, -10000, -30000]);
        assert_eq!(
            result.seats.iter().map(|s| s.placement).collect::<Vec<_>>(),
            [1, 2, 3, 4]
        );
    }

    #[test]
    fn tied_players_split_pooled_uma() {
        let tokens = [
            "100001", "20000", "100002", "30000", "100003", "25000", "100004", "25000",
        ];
        let result = normalize(&tokens, &RuleSet::default()).unwrap();
        // The two 25000 players keep input order and share uma[1] + uma[2] = 0.
        assert_eq!(ids(&result), ["100002", "100003", "100004", "100001"]);
        assert_eq!(raws(&result), [30000, 25000, 25000, 20000]);
        assert_eq!(adjs(&result), [20000, 0, 0, -20000]);
    }

    #[test]
    fn handles_negative_scores() {
        let tokens = ["1", "25000", "2", "25000", "3", "89000", "4", "-39000"];
        let result = normalize(&tokens, &RuleSet::default()).unwrap();
        assert_eq!(ids(&result), ["3", "1", "2", "4"]);
        assert_eq!(raws(&result), [89000, 25000, 25000, -39000]);
        assert_eq!(adjs(&result), [79000, 0, 0, -79000]);
    }

    #[test]
    fn tie_for_first_shares_top_uma() {
        let tokens = ["a", "40000", "b", "40000", "c", "10000", "d", "10000"];
        let result = normalize(&tokens, &RuleSet::default()).unwrap();
        assert_eq!(adjs(&result), [25000, 25000, -25000, -25000]);
    }

    #[test]
    fn four_way_tie_is_all_zero() {
        let tokens = ["a", "25000", "b", "25000", "c", "25000", "d", "25000"];
        let result = normalize(&tokens, &RuleSet::default()).unwrap();
        assert_eq!(ids(&result), ["a", "b", "c", "d"]);
        assert_eq!(adjs(&result), [0, 0, 0, 0]);
    }

    #[test]
    fn thousands_shorthand_scales_up() {
        let tokens = ["a", "48.0", "b", "2.0", "c", "25.0", "d", "25.0"];
        let result = normalize(&tokens, &RuleSet::default()).unwrap();
        assert_eq!(raws(&result), [48000, 25000, 25000, 2000]);
        assert_eq!(adjs(&result).iter().sum::<i64>(), 0);
    }

    #[test]
    fn fractional_shorthand_is_exact() {
        let tokens = ["a", "25.5", "b", "24.5", "c", "30.3", "d", "19.7"];
        let result = normalize(&tokens, &RuleSet::default()).unwrap();
        assert_eq!(raws(&result), [30300, 25500, 24500, 19700]);
    }

    #[test]
    fn rejects_wrong_arity() {
        let tokens = ["100001", "25000", "100002", "25000"];
        let err = normalize(&tokens, &RuleSet::default()).unwrap_err();
        assert_eq!(err, ScoreError::BadArity { expected: 8, got: 4 });
    }

    #[test]
    fn rejects_non_numeric_score() {
        let tokens = [
            "100001", "NaN", "100002", "25000", "100003", "25000", "100004", "25000",
        ];
        let err = normalize(&tokens, &RuleSet::default()).unwrap_err();
        assert_eq!(
            err,
            ScoreError::BadNumber {
                token: "NaN".to_string()
            }
        );
    }

    #[test]
    fn rejects_out_of_range_scores() {
        // Parseable but absurd magnitudes must fail validation, not
        // saturate the milli conversion and wrap the sum.
        let tokens = ["a", "1e300", "b", "1e300", "c", "1e300", "d", "1e300"];
        let err = normalize(&tokens, &RuleSet::default()).unwrap_err();
        assert_eq!(
            err,
            ScoreError::BadNumber {
                token: "1e300".to_string()
            }
        );

        let tokens = ["a", "-1e18", "b", "25000", "c", "25000", "d", "25000"];
        let err = normalize(&tokens, &RuleSet::default()).unwrap_err();
        assert_eq!(
            err,
            ScoreError::BadNumber {
                token: "-1e18".to_string()
            }
        );
    }

    #[test]
    fn rejects_bad_sum_naming_it() {
        let tokens = [
            "100001", "25000", "100002", "25000", "100003", "25000", "100004", "30000",
        ];
        let err = normalize(&tokens, &RuleSet::default()).unwrap_err();
        assert_eq!(
            err,
            ScoreError::BadSum {
                expected: 100000,
                got: 105000.0
            }
        );
        assert!(err.to_string().contains("105000"));
    }

    #[test]
    fn custom_rule_table() {
        let rules = RuleSet {
            starting_stake: 30000,
            uma: [30, 10, -10, -30],
        };
        let tokens = ["a", "60000", "b", "40000", "c", "20000", "d", "0"];
        let result = normalize(&tokens, &rules).unwrap();
        assert_eq!(adjs(&result), [60000, 20000, -20000, -60000]);
    }
}
