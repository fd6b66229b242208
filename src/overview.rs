//! Whole-document label-set overview.
//!
//! A coarse agreement picture that ignores label text entirely: which
//! categories each annotator used, how often, and how similar the category
//! sets of every pair of annotators are.
//!
//! Only human-placed labels count by default: machine labels (`auto_label`)
//! would otherwise inflate every annotator's category set equally.

use std::collections::{BTreeSet, HashSet};

use ingest::{AnnotatedDocument, RawLabel};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Which extracted labels the overview counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OverviewConfig {
    /// Label tags (`RawLabel::kind`) included in the statistics.
    pub label_tags: Vec<String>,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            label_tags: vec!["manual_label".into()],
        }
    }
}

impl OverviewConfig {
    fn counts(&self, label: &RawLabel) -> bool {
        self.label_tags.iter().any(|tag| *tag == label.kind)
    }
}

/// Per-document category statistics for a set of annotated documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelOverview {
    pub summary: OverviewSummary,
    /// Per document, category counts in first-seen order.
    #[serde(serialize_with = "nested_ordered")]
    pub label_counts: Vec<(String, Vec<(String, usize)>)>,
    /// One entry per unordered pair, keyed `"<a>_vs_<b>"`.
    #[serde(serialize_with = "ordered")]
    pub overlap_analysis: Vec<(String, PairOverlap)>,
    pub statistics: OverviewStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewSummary {
    pub num_annotators: usize,
    pub annotators: Vec<String>,
    pub total_unique_labels: usize,
    /// Sorted.
    pub unique_label_types: Vec<String>,
}

/// Category-set overlap between two documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairOverlap {
    pub common_labels: usize,
    pub total_unique_labels: usize,
    /// Set Jaccard of category names, 3 decimals; 0 when both sets are empty.
    pub jaccard_similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewStatistics {
    #[serde(serialize_with = "ordered")]
    pub total_labels_per_annotator: Vec<(String, usize)>,
    /// 2 decimals; 0 with no documents.
    pub avg_labels_per_annotator: f64,
}

/// Compute the overview for `documents`, identified by their `name`.
///
/// Labels whose tag is not listed in `cfg.label_tags` are ignored.
pub fn label_overview(documents: &[AnnotatedDocument], cfg: &OverviewConfig) -> LabelOverview {
    let counted: Vec<Vec<&RawLabel>> = documents
        .iter()
        .map(|doc| doc.labels.iter().filter(|l| cfg.counts(l)).collect())
        .collect();
    let categories: Vec<HashSet<&str>> = counted
        .iter()
        .map(|labels| labels.iter().map(|l| l.category.as_str()).collect())
        .collect();

    let unique: BTreeSet<&str> = categories.iter().flatten().copied().collect();

    let label_counts = documents
        .iter()
        .zip(&counted)
        .map(|(doc, labels)| {
            let mut counts: Vec<(String, usize)> = Vec::new();
            for label in labels {
                match counts.iter_mut().find(|(name, _)| *name == label.category) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((label.category.clone(), 1)),
                }
            }
            (doc.name.clone(), counts)
        })
        .collect();

    let mut overlap_analysis = Vec::new();
    for i in 0..documents.len() {
        for j in (i + 1)..documents.len() {
            let common = categories[i].intersection(&categories[j]).count();
            let union = categories[i].union(&categories[j]).count();
            let jaccard = if union > 0 {
                common as f64 / union as f64
            } else {
                0.0
            };
            overlap_analysis.push((
                format!("{}_vs_{}", documents[i].name, documents[j].name),
                PairOverlap {
                    common_labels: common,
                    total_unique_labels: union,
                    jaccard_similarity: round_to(jaccard, 3),
                },
            ));
        }
    }

    let total_labels_per_annotator: Vec<(String, usize)> = documents
        .iter()
        .zip(&counted)
        .map(|(doc, labels)| (doc.name.clone(), labels.len()))
        .collect();
    let avg = if documents.is_empty() {
        0.0
    } else {
        let total: usize = total_labels_per_annotator.iter().map(|(_, n)| n).sum();
        round_to(total as f64 / documents.len() as f64, 2)
    };

    LabelOverview {
        summary: OverviewSummary {
            num_annotators: documents.len(),
            annotators: documents.iter().map(|doc| doc.name.clone()).collect(),
            total_unique_labels: unique.len(),
            unique_label_types: unique.into_iter().map(str::to_owned).collect(),
        },
        label_counts,
        overlap_analysis,
        statistics: OverviewStatistics {
            total_labels_per_annotator,
            avg_labels_per_annotator: avg,
        },
    }
}

fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round_ties_even() / scale
}

fn ordered<S, V>(entries: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, value) in entries {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

struct OrderedMap<'a, V>(&'a [(String, V)]);

impl<V: Serialize> Serialize for OrderedMap<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ordered(self.0, serializer)
    }
}

fn nested_ordered<S: Serializer>(
    entries: &[(String, Vec<(String, usize)>)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, counts) in entries {
        map.serialize_entry(key, &OrderedMap(counts))?;
    }
    map.end()
}
