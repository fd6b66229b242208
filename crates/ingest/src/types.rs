//! Records produced by label extraction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::decode::TextEncoding;

/// One label as found in the markup, before tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLabel {
    /// `label_<n>`, sequential in extraction order. Stable across runs.
    pub id: String,
    /// Tag the label came from, e.g. `manual_label`.
    pub kind: String,
    /// Category name; empty when no category attribute was present.
    pub category: String,
    /// Concatenated descendant text, whitespace untouched.
    pub raw_text: String,
    /// All attributes except presentation-only ones, keyed by lower-case name.
    pub attributes: BTreeMap<String, String>,
}

/// A fully extracted annotated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedDocument {
    /// Display name, normally the file stem.
    pub name: String,
    pub labels: Vec<RawLabel>,
    /// Text of the whole document with markup removed.
    pub full_text: String,
    /// Encoding the source bytes were decoded with.
    pub encoding: TextEncoding,
    /// True when undecodable bytes had to be dropped.
    pub lossy: bool,
}
