//! Property-based tests for score normalization invariants.
//!
//! Raw scores are generated in multiples of 100 with the fourth derived so
//! the sum is always exactly the stake total.

use proptest::prelude::*;
use riichi_ledger::score::{RuleSet, normalize};

fn tokens_for(scores: [i64; 4]) -> Vec<String> {
    ["a", "b", "c", "d"]
        .iter()
        .zip(scores)
        .flat_map(|(id, score)| [id.to_string(), score.to_string()])
        .collect()
}

/// Same scores in thousands shorthand ("47.3" instead of "47300").
fn shorthand_tokens_for(scores: [i64; 4]) -> Vec<String> {
    ["a", "b", "c", "d"]
        .iter()
        .zip(scores)
        .flat_map(|(id, score)| [id.to_string(), format!("{}", score as f64 / 1000.0)])
        .collect()
}

fn valid_scores() -> impl Strategy<Value = [i64; 4]> {
    (-500i64..1200, -500i64..1200, -500i64..1200).prop_map(|(a, b, c)| {
        let (a, b, c) = (a * 100, b * 100, c * 100);
        [a, b, c, 100000 - a - b - c]
    })
}

proptest! {
    #[test]
    fn adjusted_scores_sum_to_zero(scores in valid_scores()) {
        let result = normalize(&tokens_for(scores), &RuleSet::default()).unwrap();
        prop_assert_eq!(result.seats.iter().map(|s| s.score_adj).sum::<i64>(), 0);
    }

    #[test]
    fn raw_scores_are_conserved(scores in valid_scores()) {
        let result = normalize(&tokens_for(scores), &RuleSet::default()).unwrap();
        prop_assert_eq!(result.seats.iter().map(|s| s.score_raw).sum::<i64>(), 100000);
    }

    #[test]
    fn seats_are_sorted_descending_with_placements(scores in valid_scores()) {
        let result = normalize(&tokens_for(scores), &RuleSet::default()).unwrap();
        for (upper, lower) in result.seats.iter().zip(result.seats.iter().skip(1)) {
            prop_assert!(upper.score_raw >= lower.score_raw);
        }
        let placements: Vec<u8> = result.seats.iter().map(|s| s.placement).collect();
        prop_assert_eq!(placements, vec![1, 2, 3, 4]);
    }

    #[test]
    fn tied_raw_scores_get_equal_adjusted_scores(scores in valid_scores()) {
        let result = normalize(&tokens_for(scores), &RuleSet::default()).unwrap();
        for (upper, lower) in result.seats.iter().zip(result.seats.iter().skip(1)) {
            if upper.score_raw == lower.score_raw {
                prop_assert_eq!(upper.score_adj, lower.score_adj);
            }
        }
    }

    #[test]
    fn shorthand_notation_is_equivalent(scores in valid_scores()) {
        let rules = RuleSet::default();
        let whole = normalize(&tokens_for(scores), &rules).unwrap();
        let shorthand = normalize(&shorthand_tokens_for(scores), &rules).unwrap();
        prop_assert_eq!(whole, shorthand);
    }
}
