//! Aggregate statistics over a matching result.

use crate::types::{round_ratio, DocumentMatches, MatchSummary, OverlapType};

/// Count labels, comparisons and outcomes across every source document.
///
/// A comparison is one (source label, other document) search. Searches
/// that found no candidate count as `no_matches`, the same as candidates
/// classified `none`.
///
/// ```rust
/// use matcher::{summarize, MatchSummary};
///
/// assert_eq!(summarize(&[]), MatchSummary::default());
/// ```
pub fn summarize(matches: &[DocumentMatches]) -> MatchSummary {
    let mut summary = MatchSummary::default();

    for document in matches {
        summary.total_labels += document.labels.len();
        for label in &document.labels {
            for search in &label.matches {
                summary.total_comparisons += 1;
                match search.candidate.as_ref().map(|c| c.match_type) {
                    Some(OverlapType::Exact) => summary.exact_matches += 1,
                    Some(OverlapType::Partial) => summary.partial_matches += 1,
                    Some(OverlapType::None) | None => summary.no_matches += 1,
                }
            }
        }
    }

    if summary.total_comparisons > 0 {
        let total = summary.total_comparisons as f64;
        summary.exact_match_rate = round_ratio(summary.exact_matches as f64 / total);
        summary.partial_match_rate = round_ratio(summary.partial_matches as f64 / total);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocumentMatch, LabelInfo, LabelMatches, MatchCandidate};

    fn search(document: &str, match_type: Option<OverlapType>) -> DocumentMatch {
        DocumentMatch {
            document: document.into(),
            candidate: match_type.map(|match_type| MatchCandidate {
                label_id: "label_0".into(),
                match_type,
                overlap: 0.4,
                label_name: String::new(),
                text: String::new(),
            }),
        }
    }

    fn label(id: &str, matches: Vec<DocumentMatch>) -> LabelMatches {
        LabelMatches {
            label_id: id.into(),
            label_info: LabelInfo {
                name: String::new(),
                text: String::new(),
                token_count: 0,
            },
            matches,
        }
    }

    #[test]
    fn counts_every_outcome() {
        let matches = vec![
            DocumentMatches {
                document: "a".into(),
                labels: vec![
                    label(
                        "label_0",
                        vec![search("b", Some(OverlapType::Exact)), search("c", None)],
                    ),
                    label(
                        "label_1",
                        vec![
                            search("b", Some(OverlapType::Partial)),
                            search("c", Some(OverlapType::None)),
                        ],
                    ),
                ],
            },
            DocumentMatches {
                document: "b".into(),
                labels: vec![label(
                    "label_0",
                    vec![search("a", Some(OverlapType::Exact)), search("c", None)],
                )],
            },
        ];

        let summary = summarize(&matches);
        assert_eq!(summary.total_labels, 3);
        assert_eq!(summary.total_comparisons, 6);
        assert_eq!(summary.exact_matches, 2);
        assert_eq!(summary.partial_matches, 1);
        assert_eq!(summary.no_matches, 3);
        assert_eq!(summary.exact_match_rate, 0.333);
        assert_eq!(summary.partial_match_rate, 0.167);
    }

    #[test]
    fn labels_without_comparisons_have_zero_rates() {
        let matches = vec![DocumentMatches {
            document: "only".into(),
            labels: vec![label("label_0", vec![])],
        }];
        let summary = summarize(&matches);
        assert_eq!(summary.total_labels, 1);
        assert_eq!(summary.total_comparisons, 0);
        assert_eq!(summary.exact_match_rate, 0.0);
        assert_eq!(summary.partial_match_rate, 0.0);
    }
}
