use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, Level};

use crate::metrics::metrics_recorder;
use crate::overlap::score_overlap;
use crate::preview::text_preview;
use crate::summary::summarize;
use crate::types::{
    round_ratio, Document, DocumentMatch, DocumentMatches, Label, LabelMatches, MatchCandidate,
    MatchConfig, MatchError, MatchReport, OverlapType,
};


/// Greedy cross-document label matcher.
///
/// For every label of every document, and every *other* document, the
/// matcher keeps the single best-scoring label of that other document. Each
/// (label, document) search is independent: a target label may be claimed
/// by any number of source labels, and the search from B back to A need not
/// return the label it started from.
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    /// Construct a matcher, rejecting an invalid configuration up front.
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Find the best candidate for `label` among `target`'s labels.
    pub fn best_match(&self, label: &Label, target: &Document) -> Option<MatchCandidate> {
        find_best_match(&label.tokens, target, self.config.min_overlap)
    }

    /// Match every label of every document against every other document.
    ///
    /// Results are in input document order. With `parallel` enabled, source
    /// documents are searched on the rayon pool; the output is identical.
    pub fn match_documents(&self, documents: &[Document]) -> Vec<DocumentMatches> {
        let span = tracing::span!(
            Level::INFO,
            "matcher.match_documents",
            documents = documents.len(),
            min_overlap = self.config.min_overlap,
            parallel = self.config.parallel
        );
        let _guard = span.enter();

        if self.config.parallel {
            documents
                .par_iter()
                .enumerate()
                .map(|(source_idx, source)| self.match_source(source_idx, source, documents))
                .collect()
        } else {
            documents
                .iter()
                .enumerate()
                .map(|(source_idx, source)| self.match_source(source_idx, source, documents))
                .collect()
        }
    }

    /// Match all documents and aggregate the result into a report.
    pub fn run(&self, documents: &[Document]) -> MatchReport {
        let start = Instant::now();
        let matches = self.match_documents(documents);
        let summary = summarize(&matches);
        let latency = start.elapsed();

        info!(
            documents = documents.len(),
            labels = summary.total_labels,
            comparisons = summary.total_comparisons,
            exact = summary.exact_matches,
            partial = summary.partial_matches,
            unmatched = summary.no_matches,
            elapsed_micros = latency.as_micros(),
            "match_complete"
        );

        if let Some(recorder) = metrics_recorder() {
            recorder.record_match(documents.len(), summary.total_comparisons, latency);
        }

        MatchReport { summary, matches }
    }

    fn match_source(
        &self,
        source_idx: usize,
        source: &Document,
        documents: &[Document],
    ) -> DocumentMatches {
        let labels = source
            .labels
            .iter()
            .map(|label| {
                let matches = documents
                    .iter()
                    .enumerate()
                    .filter(|(target_idx, _)| *target_idx != source_idx)
                    .map(|(_, target)| DocumentMatch {
                        document: target.id.clone(),
                        candidate: self.best_match(label, target),
                    })
                    .collect();
                LabelMatches {
                    label_id: label.id.clone(),
                    label_info: label.info(),
                    matches,
                }
            })
            .collect();

        debug!(
            document = %source.id,
            labels = source.labels.len(),
            targets = documents.len().saturating_sub(1),
            "source_document_matched"
        );

        DocumentMatches {
            document: source.id.clone(),
            labels,
        }
    }
}

/// Best-match search for one token sequence in one target document.
///
/// A candidate is kept only when its unrounded ratio is at least
/// `min_overlap` and strictly greater than the best ratio seen so far,
/// starting from zero. Equal ratios therefore keep the earliest label in
/// `target`'s order, and a zero-ratio label is never a match.
pub fn find_best_match<S: AsRef<str>>(
    tokens: &[S],
    target: &Document,
    min_overlap: f64,
) -> Option<MatchCandidate> {
    let mut best: Option<(&Label, f64, OverlapType)> = None;
    let mut best_ratio = 0.0;

    for candidate in &target.labels {
        let score = score_overlap(tokens, &candidate.tokens);
        if score.overlap_ratio >= min_overlap && score.overlap_ratio > best_ratio {
            best_ratio = score.overlap_ratio;
            best = Some((candidate, score.overlap_ratio, score.overlap_type));
        }
    }

    best.map(|(label, ratio, match_type)| MatchCandidate {
        label_id: label.id.clone(),
        match_type,
        overlap: round_ratio(ratio),
        label_name: label.category.clone(),
        text: text_preview(label.raw_text.trim()),
    })
}
