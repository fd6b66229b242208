//! Workspace umbrella crate for labelmatch.
//!
//! This crate stitches ingest, tokenization and matching together so callers
//! can go from a list of annotated HTML files to an agreement report with a
//! single call to [`analyze_files`].

pub mod config;
pub mod overview;

pub use canonical::{CanonicalError, Token, TokenizeConfig, normalized_tokens, source_digest, tokenize};
pub use ingest::{
    AnnotatedDocument, IngestConfig, IngestError, RawLabel, TextEncoding, load_document,
    parse_document,
};
pub use matcher::{
    Document, Label, MatchConfig, MatchError, MatchReport, MatchSummary, Matcher, OverlapScore,
    OverlapType, score_overlap,
};

pub use crate::config::{AppConfig, ConfigLoadError, OutputConfig};
pub use crate::overview::{LabelOverview, OverviewConfig, label_overview};

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::path::Path;
use std::time::Instant;

use canonical::normalized_tokens_with_config;
use tracing::{info, warn};

/// Everything one agreement run reports: the summary plus per-document matches.
pub type AgreementReport = MatchReport;

/// Errors that can occur while running the pipeline over a set of files.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Agreement needs at least two documents.
    NotEnoughDocuments { found: usize },
    Ingest(IngestError),
    Match(MatchError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::NotEnoughDocuments { found } => write!(
                f,
                "at least 2 annotated files are required for agreement analysis, got {found}"
            ),
            PipelineError::Ingest(err) => write!(f, "ingest failure: {err}"),
            PipelineError::Match(err) => write!(f, "matching failure: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Ingest(err) => Some(err),
            PipelineError::Match(err) => Some(err),
            PipelineError::NotEnoughDocuments { .. } => None,
        }
    }
}

impl From<IngestError> for PipelineError {
    fn from(value: IngestError) -> Self {
        PipelineError::Ingest(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

/// Tokenize an annotated document's labels and full text for matching.
pub fn build_document(annotated: &AnnotatedDocument, cfg: &TokenizeConfig) -> Document {
    let labels = annotated
        .labels
        .iter()
        .map(|raw| {
            Label::with_config(&raw.id, &raw.category, &raw.raw_text, cfg)
                .with_attributes(raw.attributes.clone())
        })
        .collect();
    Document::new(&annotated.name, labels)
        .with_full_tokens(normalized_tokens_with_config(&annotated.full_text, cfg))
}

/// Load every file and run cross-document matching over them.
///
/// Fewer than two paths is rejected before anything is read. A failure to
/// load any file aborts the whole run.
pub fn analyze_files<P: AsRef<Path>>(
    paths: &[P],
    cfg: &AppConfig,
) -> Result<AgreementReport, PipelineError> {
    let documents = load_documents(paths, &cfg.ingest)?;
    analyze_documents(documents, &cfg.tokenize, &cfg.matcher)
}

/// Run cross-document matching over already-loaded documents.
pub fn analyze_documents(
    documents: Vec<AnnotatedDocument>,
    tokenize_cfg: &TokenizeConfig,
    match_cfg: &MatchConfig,
) -> Result<AgreementReport, PipelineError> {
    ensure_enough(documents.len())?;
    let matcher = Matcher::new(match_cfg.clone())?;

    let start = Instant::now();
    let documents = with_unique_names(documents);
    let documents: Vec<Document> = documents
        .iter()
        .map(|doc| build_document(doc, tokenize_cfg))
        .collect();
    check_same_source(&documents, tokenize_cfg);

    let report = matcher.run(&documents);
    info!(
        documents = documents.len(),
        exact_match_rate = report.summary.exact_match_rate,
        partial_match_rate = report.summary.partial_match_rate,
        elapsed_micros = start.elapsed().as_micros(),
        "agreement_complete"
    );
    Ok(report)
}

/// Load every file and compute the label-set overview.
///
/// Only labels whose tag is listed in `cfg.overview` are counted.
pub fn overview_files<P: AsRef<Path>>(
    paths: &[P],
    cfg: &AppConfig,
) -> Result<LabelOverview, PipelineError> {
    let documents = with_unique_names(load_documents(paths, &cfg.ingest)?);
    Ok(label_overview(&documents, &cfg.overview))
}

fn load_documents<P: AsRef<Path>>(
    paths: &[P],
    cfg: &IngestConfig,
) -> Result<Vec<AnnotatedDocument>, PipelineError> {
    ensure_enough(paths.len())?;
    paths
        .iter()
        .map(|path| load_document(path, cfg).map_err(PipelineError::from))
        .collect()
}

fn ensure_enough(found: usize) -> Result<(), PipelineError> {
    if found < 2 {
        return Err(PipelineError::NotEnoughDocuments { found });
    }
    Ok(())
}

/// Suffix repeated document names with `-2`, `-3`, ... in input order.
fn with_unique_names(mut documents: Vec<AnnotatedDocument>) -> Vec<AnnotatedDocument> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut taken: Vec<String> = Vec::with_capacity(documents.len());

    for doc in &mut documents {
        let base = doc.name.clone();
        let mut name = base.clone();
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count > 1 || taken.contains(&name) {
            let mut n = (*count).max(2);
            loop {
                name = format!("{base}-{n}");
                if !taken.contains(&name) {
                    break;
                }
                n += 1;
            }
            warn!(original = %base, renamed = %name, "duplicate document name");
        }
        taken.push(name.clone());
        doc.name = name;
    }
    documents
}

fn check_same_source(documents: &[Document], cfg: &TokenizeConfig) {
    let Some(first) = documents.first() else {
        return;
    };
    let reference = source_digest(cfg.version, &first.full_tokens);
    for doc in &documents[1..] {
        let digest = source_digest(cfg.version, &doc.full_tokens);
        if digest != reference {
            warn!(
                reference = %first.id,
                document = %doc.id,
                "document text differs from the first document; label overlap may be unreliable"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotated(name: &str, html: &str) -> AnnotatedDocument {
        parse_document(name, html.as_bytes(), &IngestConfig::default()).expect("parse")
    }

    #[test]
    fn build_document_tokenizes_labels_and_text() {
        let doc = build_document(
            &annotated(
                "a",
                "<p>The <manual_label name='animal' data-x='1'>Cat</manual_label> sat.</p>",
            ),
            &TokenizeConfig::default(),
        );
        assert_eq!(doc.id, "a");
        assert_eq!(doc.labels[0].tokens, vec!["cat"]);
        assert_eq!(doc.labels[0].category, "animal");
        assert_eq!(doc.labels[0].attributes.get("data-x").map(String::as_str), Some("1"));
        assert_eq!(doc.full_tokens, vec!["the", "cat", "sat", "."]);
    }

    #[test]
    fn fewer_than_two_documents_rejected() {
        let docs = vec![annotated("a", "<p/>")];
        assert_eq!(
            analyze_documents(docs, &TokenizeConfig::default(), &MatchConfig::default()),
            Err(PipelineError::NotEnoughDocuments { found: 1 })
        );

        let none: [&str; 0] = [];
        assert_eq!(
            analyze_files(&none, &AppConfig::default()),
            Err(PipelineError::NotEnoughDocuments { found: 0 })
        );
    }

    #[test]
    fn invalid_match_config_surfaces() {
        let docs = vec![annotated("a", "<p/>"), annotated("b", "<p/>")];
        let cfg = MatchConfig {
            min_overlap: 2.0,
            parallel: false,
        };
        assert!(matches!(
            analyze_documents(docs, &TokenizeConfig::default(), &cfg),
            Err(PipelineError::Match(MatchError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn duplicate_names_get_suffixes() {
        let docs = vec![
            annotated("run", "<p/>"),
            annotated("run", "<p/>"),
            annotated("run-2", "<p/>"),
            annotated("run", "<p/>"),
        ];
        let names: Vec<String> = with_unique_names(docs).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["run", "run-2", "run-2-2", "run-3"]);
    }

    #[test]
    fn report_uses_unique_names() {
        let html = "<manual_label name='x'>same words</manual_label>";
        let docs = vec![annotated("copy", html), annotated("copy", html)];
        let report =
            analyze_documents(docs, &TokenizeConfig::default(), &MatchConfig::default())
                .expect("analyze");
        assert_eq!(report.matches[0].document, "copy");
        assert_eq!(report.matches[1].document, "copy-2");
        assert_eq!(report.matches[0].labels[0].matches[0].document, "copy-2");
        assert_eq!(report.summary.exact_matches, 2);
    }

    #[test]
    fn pipeline_error_display_and_source() {
        let err = PipelineError::from(IngestError::NotFound("x.html".into()));
        assert!(err.to_string().starts_with("ingest failure"));
        assert!(err.source().is_some());
        assert!(PipelineError::NotEnoughDocuments { found: 1 }.source().is_none());
    }
}
