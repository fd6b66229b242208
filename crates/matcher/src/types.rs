use std::collections::BTreeMap;

use canonical::{normalized_tokens_with_config, TokenizeConfig};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::preview::text_preview;

/// Default minimum overlap ratio a candidate needs to count as a match.
pub const DEFAULT_MIN_OVERLAP: f64 = 0.5;

/// Overlap ratio at or above which a non-identical pair is classified `partial`.
///
/// Independent of [`MatchConfig::min_overlap`]: classification and match
/// eligibility are separate decisions.
pub const PARTIAL_THRESHOLD: f64 = 0.5;

/// Round a ratio to 3 decimal digits for reporting.
///
/// Halves go to the even neighbour, so `1/16` reports as `0.062`.
pub fn round_ratio(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}

/// Configuration for a matching run.
///
/// Cheap to clone and serde-friendly so it can be embedded in file-based
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    /// Minimum overlap ratio in `[0, 1]` a candidate must reach to be eligible.
    pub min_overlap: f64,
    /// Search source documents on the rayon pool. Output is identical either way.
    pub parallel: bool,
}

impl MatchConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), MatchError> {
        if !(0.0..=1.0).contains(&self.min_overlap) {
            return Err(MatchError::InvalidConfig(format!(
                "min_overlap must be between 0.0 and 1.0, got {}",
                self.min_overlap
            )));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_overlap: DEFAULT_MIN_OVERLAP,
            parallel: false,
        }
    }
}

/// Errors produced by the matching layer.
///
/// Matching itself is total; only configuration can be rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchError {
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}

/// Discrete classification of a label pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapType {
    /// Token sequences are identical element-wise.
    Exact,
    /// Not identical, but overlap ratio >= [`PARTIAL_THRESHOLD`].
    Partial,
    None,
}

/// Symmetric similarity between two token sequences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlapScore {
    pub exact_match: bool,
    /// Unrounded Jaccard index of the two token sets. Serialized rounded.
    #[serde(serialize_with = "serialize_rounded")]
    pub overlap_ratio: f64,
    /// Size of the token-set intersection.
    pub common_tokens: usize,
    pub overlap_type: OverlapType,
}

impl OverlapScore {
    /// Score for pairs where either side has no tokens.
    pub const DEGENERATE: OverlapScore = OverlapScore {
        exact_match: false,
        overlap_ratio: 0.0,
        common_tokens: 0,
        overlap_type: OverlapType::None,
    };

    /// Ratio rounded to 3 decimals, as reported.
    pub fn rounded_ratio(&self) -> f64 {
        round_ratio(self.overlap_ratio)
    }
}

fn serialize_rounded<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_ratio(*value))
}

/// A label with its normalized tokens. Belongs to exactly one [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Unique within the owning document; opaque to the matcher.
    pub id: String,
    /// Category name; may be empty.
    pub category: String,
    /// Original span text, whitespace untouched.
    pub raw_text: String,
    /// Normalized tokens derived from `raw_text`. May be empty.
    pub tokens: Vec<String>,
    /// Display-only attributes; never consulted when matching.
    pub attributes: BTreeMap<String, String>,
}

impl Label {
    /// Build a label, tokenizing `raw_text` with the default tokenizer.
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        raw_text: impl Into<String>,
    ) -> Self {
        Self::with_config(id, category, raw_text, &TokenizeConfig::default())
    }

    /// Build a label, tokenizing `raw_text` under `cfg`.
    pub fn with_config(
        id: impl Into<String>,
        category: impl Into<String>,
        raw_text: impl Into<String>,
        cfg: &TokenizeConfig,
    ) -> Self {
        let raw_text = raw_text.into();
        let tokens = normalized_tokens_with_config(&raw_text, cfg);
        Self {
            id: id.into(),
            category: category.into(),
            raw_text,
            tokens,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: BTreeMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Trimmed text truncated for reports.
    pub fn preview(&self) -> String {
        text_preview(self.raw_text.trim())
    }

    pub fn info(&self) -> LabelInfo {
        LabelInfo {
            name: self.category.clone(),
            text: self.preview(),
            token_count: self.tokens.len(),
        }
    }
}

/// One annotated copy of the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Display identifier, normally the file stem. Unique within a run.
    pub id: String,
    /// Labels in extraction order. This order drives first-seen tie-breaks.
    pub labels: Vec<Label>,
    /// Normalized tokens of the whole document; context only.
    pub full_tokens: Vec<String>,
}

impl Document {
    pub fn new(id: impl Into<String>, labels: Vec<Label>) -> Self {
        Self {
            id: id.into(),
            labels,
            full_tokens: Vec::new(),
        }
    }

    pub fn with_full_tokens(mut self, full_tokens: Vec<String>) -> Self {
        self.full_tokens = full_tokens;
        self
    }
}

/// Display info for a source label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelInfo {
    pub name: String,
    pub text: String,
    pub token_count: usize,
}

/// Best candidate found for a label in one other document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub label_id: String,
    pub match_type: OverlapType,
    /// Overlap ratio rounded to 3 decimals.
    pub overlap: f64,
    pub label_name: String,
    /// Truncated preview of the target label's text.
    pub text: String,
}

/// Outcome of searching one other document for a label.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMatch {
    /// Identifier of the searched document.
    pub document: String,
    /// `None` when no label cleared the threshold.
    pub candidate: Option<MatchCandidate>,
}

/// All searches for one source label, one per other document.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMatches {
    pub label_id: String,
    pub label_info: LabelInfo,
    /// In document order, skipping the label's own document.
    pub matches: Vec<DocumentMatch>,
}

/// Matcher output for one source document.
///
/// Serializes as
/// `{"document": id, "labels": {label_id: {"label_info": .., "matches": {doc: candidate|null}}}}`
/// with label and document order preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMatches {
    pub document: String,
    pub labels: Vec<LabelMatches>,
}

impl Serialize for DocumentMatches {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DocumentMatches", 2)?;
        state.serialize_field("document", &self.document)?;
        state.serialize_field("labels", &LabelTable(&self.labels))?;
        state.end()
    }
}

struct LabelTable<'a>(&'a [LabelMatches]);

impl Serialize for LabelTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for label in self.0 {
            map.serialize_entry(
                &label.label_id,
                &LabelEntry {
                    label_info: &label.label_info,
                    matches: MatchTable(&label.matches),
                },
            )?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct LabelEntry<'a> {
    label_info: &'a LabelInfo,
    matches: MatchTable<'a>,
}

struct MatchTable<'a>(&'a [DocumentMatch]);

impl Serialize for MatchTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(&entry.document, &entry.candidate)?;
        }
        map.end()
    }
}

/// Aggregate counts over a full matching result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub total_labels: usize,
    /// One per (source label, other document) pair, whatever the outcome.
    pub total_comparisons: usize,
    pub exact_matches: usize,
    pub partial_matches: usize,
    /// `none`-typed candidates plus searches that found nothing.
    pub no_matches: usize,
    /// `exact_matches / total_comparisons`, 3 decimals; 0 with no comparisons.
    pub exact_match_rate: f64,
    /// `partial_matches / total_comparisons`, 3 decimals; 0 with no comparisons.
    pub partial_match_rate: f64,
}

/// Summary plus per-document matches: everything a run reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub summary: MatchSummary,
    pub matches: Vec<DocumentMatches>,
}
