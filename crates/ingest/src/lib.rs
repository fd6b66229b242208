//! Annotated document ingest.
//!
//! This is where annotated copies enter the pipeline. We take a file (or
//! raw bytes), decode it, parse the markup, and hand back every label with
//! its category, raw text and attributes, plus the plain text of the whole
//! document.
//!
//! ## What we do here
//!
//! - **Decode** - strict UTF-8 first, then the configured fallbacks, then a
//!   permissive decode that drops undecodable bytes
//! - **Extract labels** - configured tags, grouped by tag, document order
//!   within a tag, sequential `label_<n>` ids
//! - **Resolve categories** - first present key from a fallback list
//! - **Filter attributes** - presentation-only attributes are dropped
//! - **Log everything** - structured logs via tracing
//!
//! Tokenization happens downstream; nothing here looks inside label text.
//!
//! ## Example
//!
//! ```
//! use ingest::{parse_document, IngestConfig};
//!
//! let html = b"<p><manual_label name='animal'>The cat</manual_label> sat.</p>";
//! let doc = parse_document("annotator-a", html, &IngestConfig::default()).unwrap();
//!
//! assert_eq!(doc.name, "annotator-a");
//! assert_eq!(doc.labels.len(), 1);
//! assert_eq!(doc.labels[0].category, "animal");
//! assert_eq!(doc.full_text, "The cat sat.");
//! ```
use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::{info, warn, Level};

mod config;
mod decode;
mod error;
mod extract;
mod types;

pub use crate::config::{ConfigError, IngestConfig};
pub use crate::decode::{decode_text, DecodedText, TextEncoding};
pub use crate::error::IngestError;
pub use crate::extract::{extract_labels, ExtractedLabels};
pub use crate::types::{AnnotatedDocument, RawLabel};

/// Read, decode and extract one annotated file.
///
/// The document is named after the file stem. Any failure aborts the load;
/// no partially extracted document is ever returned.
pub fn load_document(
    path: impl AsRef<Path>,
    cfg: &IngestConfig,
) -> Result<AnnotatedDocument, IngestError> {
    let path = path.as_ref();
    let shown = path.display().to_string();
    let start = Instant::now();

    let result = read_input(path, &shown, cfg)
        .and_then(|bytes| parse_document(document_name(path), &bytes, cfg));

    if let Err(err) = &result {
        warn!(
            path = %shown,
            error = %err,
            elapsed_micros = start.elapsed().as_micros(),
            "ingest_failure"
        );
    }
    result
}

fn read_input(path: &Path, shown: &str, cfg: &IngestConfig) -> Result<Vec<u8>, IngestError> {
    if let Some(limit) = cfg.max_input_bytes {
        let size = fs::metadata(path)
            .map_err(|err| IngestError::from_io(shown, &err))?
            .len();
        let size = usize::try_from(size).unwrap_or(usize::MAX);
        if size > limit {
            return Err(IngestError::InputTooLarge {
                path: shown.to_string(),
                size,
                limit,
            });
        }
    }
    fs::read(path).map_err(|err| IngestError::from_io(shown, &err))
}

/// Decode and extract an annotated document from raw bytes.
pub fn parse_document(
    name: impl Into<String>,
    bytes: &[u8],
    cfg: &IngestConfig,
) -> Result<AnnotatedDocument, IngestError> {
    let start = Instant::now();
    let name = name.into();
    cfg.validate()?;

    let span = tracing::span!(Level::INFO, "ingest.parse_document", document = %name);
    let _guard = span.enter();

    let decoded = decode_text(bytes, &cfg.encodings);
    if decoded.lossy {
        warn!(
            document = %name,
            tried = ?cfg.encodings,
            "no configured encoding decoded the input; undecodable bytes dropped"
        );
    }

    let extracted = extract_labels(&decoded.text, cfg)?;
    info!(
        document = %name,
        labels = extracted.labels.len(),
        encoding = %decoded.encoding,
        input_bytes = bytes.len(),
        elapsed_micros = start.elapsed().as_micros(),
        "ingest_success"
    );

    Ok(AnnotatedDocument {
        name,
        labels: extracted.labels,
        full_text: extracted.full_text,
        encoding: decoded.encoding,
        lossy: decoded.lossy,
    })
}

/// Display name for a document path: its file stem.
///
/// ```rust
/// assert_eq!(ingest::document_name("runs/annotator_a.html"), "annotator_a");
/// assert_eq!(ingest::document_name("archive.tar.gz"), "archive.tar");
/// ```
pub fn document_name(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
