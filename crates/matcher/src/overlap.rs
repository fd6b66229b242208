//! Token-set overlap scoring.

use std::collections::HashSet;

use crate::types::{OverlapScore, OverlapType, PARTIAL_THRESHOLD};

/// Score two token sequences.
///
/// The ratio is the Jaccard index of the two token *sets*; duplicates
/// collapse. `exact_match` compares the *sequences*, order included. If
/// either side is empty the result is [`OverlapScore::DEGENERATE`], even when
/// both are empty.
///
/// ```rust
/// use matcher::{score_overlap, OverlapType};
///
/// let a = ["a", "b", "c", "d"];
/// let b = ["a", "b", "x", "y"];
/// let score = score_overlap(&a, &b);
/// assert_eq!(score.common_tokens, 2);
/// assert_eq!(score.rounded_ratio(), 0.333);
/// assert_eq!(score.overlap_type, OverlapType::None);
/// ```
pub fn score_overlap<A, B>(t1: &[A], t2: &[B]) -> OverlapScore
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let set1: HashSet<&str> = t1.iter().map(AsRef::as_ref).collect();
    let set2: HashSet<&str> = t2.iter().map(AsRef::as_ref).collect();

    if set1.is_empty() || set2.is_empty() {
        return OverlapScore::DEGENERATE;
    }

    let common_tokens = set1.intersection(&set2).count();
    let union = set1.len() + set2.len() - common_tokens;
    let overlap_ratio = common_tokens as f64 / union as f64;

    let exact_match = t1.len() == t2.len()
        && t1
            .iter()
            .zip(t2.iter())
            .all(|(a, b)| a.as_ref() == b.as_ref());

    let overlap_type = if exact_match {
        OverlapType::Exact
    } else if overlap_ratio >= PARTIAL_THRESHOLD {
        OverlapType::Partial
    } else {
        OverlapType::None
    };

    OverlapScore {
        exact_match,
        overlap_ratio,
        common_tokens,
        overlap_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EMPTY: [&str; 0] = [];

    #[test]
    fn identical_sequences_are_exact() {
        let tokens = ["the", "cat", "sat"];
        let score = score_overlap(&tokens, &tokens);
        assert!(score.exact_match);
        assert_eq!(score.overlap_ratio, 1.0);
        assert_eq!(score.common_tokens, 3);
        assert_eq!(score.overlap_type, OverlapType::Exact);
    }

    #[test]
    fn reordered_tokens_are_partial_not_exact() {
        let score = score_overlap(&["cat", "the"], &["the", "cat"]);
        assert!(!score.exact_match);
        assert_eq!(score.overlap_ratio, 1.0);
        assert_eq!(score.overlap_type, OverlapType::Partial);
    }

    #[test]
    fn duplicates_collapse_for_ratio_but_not_for_exactness() {
        let score = score_overlap(&["a", "a", "b"], &["a", "b"]);
        assert_eq!(score.overlap_ratio, 1.0);
        assert!(!score.exact_match);
        assert_eq!(score.overlap_type, OverlapType::Partial);
    }

    #[test]
    fn half_overlap_is_partial() {
        // {a,b,c} vs {a,b,d}: 2 / 4.
        let score = score_overlap(&["a", "b", "c"], &["a", "b", "d"]);
        assert_eq!(score.overlap_ratio, 0.5);
        assert_eq!(score.overlap_type, OverlapType::Partial);
    }

    #[test]
    fn empty_sides_are_degenerate() {
        assert_eq!(score_overlap(&EMPTY, &["a"]), OverlapScore::DEGENERATE);
        assert_eq!(score_overlap(&["a"], &EMPTY), OverlapScore::DEGENERATE);
        assert_eq!(score_overlap(&EMPTY, &EMPTY), OverlapScore::DEGENERATE);
    }

    #[test]
    fn disjoint_sets_score_zero() {
        let score = score_overlap(&["a"], &["b"]);
        assert_eq!(score.overlap_ratio, 0.0);
        assert_eq!(score.common_tokens, 0);
        assert_eq!(score.overlap_type, OverlapType::None);
    }

    fn token_seq() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d", "e", ","]), 0..8)
            .prop_map(|v| v.into_iter().map(String::from).collect())
    }

    proptest! {
        #[test]
        fn ratio_is_symmetric(a in token_seq(), b in token_seq()) {
            let ab = score_overlap(&a, &b);
            let ba = score_overlap(&b, &a);
            prop_assert_eq!(ab.overlap_ratio, ba.overlap_ratio);
            prop_assert_eq!(ab.common_tokens, ba.common_tokens);
            prop_assert_eq!(ab.overlap_type, ba.overlap_type);
        }

        #[test]
        fn ratio_stays_in_unit_interval(a in token_seq(), b in token_seq()) {
            let ratio = score_overlap(&a, &b).overlap_ratio;
            prop_assert!((0.0..=1.0).contains(&ratio));
        }

        #[test]
        fn non_empty_sequences_match_themselves_exactly(a in token_seq()) {
            prop_assume!(!a.is_empty());
            let score = score_overlap(&a, &a);
            prop_assert_eq!(score.overlap_ratio, 1.0);
            prop_assert_eq!(score.overlap_type, OverlapType::Exact);
        }

        #[test]
        fn empty_side_never_matches(a in token_seq()) {
            let empty: Vec<String> = Vec::new();
            prop_assert_eq!(score_overlap(&empty, &a), OverlapScore::DEGENERATE);
            prop_assert_eq!(score_overlap(&a, &empty), OverlapScore::DEGENERATE);
        }
    }
}
