//! # Label matcher (`matcher`)
//!
//! Cross-document label matching for annotated copies of the same text.
//!
//! Given several [`Document`]s, each holding tokenized [`Label`]s, the
//! [`Matcher`] finds for every label and every *other* document the single
//! label there whose token set overlaps it most, scored by the Jaccard index
//! ([`score_overlap`]). Results are aggregated by [`summarize`] into a
//! [`MatchSummary`] of exact, partial and missing agreements.
//!
//! ## Core Types
//!
//! - [`MatchConfig`]: `min_overlap` eligibility threshold and the `parallel` switch.
//! - [`OverlapScore`] / [`OverlapType`]: pairwise similarity and its
//!   `exact` / `partial` / `none` classification.
//! - [`MatchCandidate`]: best label found in one other document.
//! - [`DocumentMatches`]: all searches for one source document.
//! - [`MatchReport`]: summary plus per-document matches.
//!
//! ## Example Usage
//!
//! ```
//! use matcher::{Document, Label, MatchConfig, Matcher, OverlapType};
//!
//! let docs = vec![
//!     Document::new("annotator_a", vec![Label::new("label_0", "animal", "The cat sat")]),
//!     Document::new("annotator_b", vec![Label::new("label_0", "animal", "the cat sat")]),
//! ];
//!
//! let matcher = Matcher::new(MatchConfig::default()).expect("valid config");
//! let report = matcher.run(&docs);
//!
//! assert_eq!(report.summary.total_comparisons, 2);
//! assert_eq!(report.summary.exact_matches, 2);
//! let hit = report.matches[0].labels[0].matches[0].candidate.as_ref().unwrap();
//! assert_eq!(hit.match_type, OverlapType::Exact);
//! ```
//!
//! ## Observability
//!
//! Runs emit `tracing` spans and events. Install a [`MatchMetrics`]
//! implementation via [`set_match_metrics`] to record per-run latency and
//! comparison counts.

pub mod engine;
pub mod metrics;
pub mod overlap;
pub mod preview;
pub mod summary;
pub mod types;

pub use crate::engine::{find_best_match, Matcher};
pub use crate::metrics::{set_match_metrics, MatchMetrics};
pub use crate::overlap::score_overlap;
pub use crate::preview::{text_preview, PREVIEW_CHARS};
pub use crate::summary::summarize;
pub use crate::types::{
    round_ratio, Document, DocumentMatch, DocumentMatches, Label, LabelInfo, LabelMatches,
    MatchCandidate, MatchConfig, MatchError, MatchReport, MatchSummary, OverlapScore, OverlapType,
    DEFAULT_MIN_OVERLAP, PARTIAL_THRESHOLD,
};
