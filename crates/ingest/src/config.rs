//! Configuration types for the ingest layer.
//!
//! [`IngestConfig`] decides which tags count as labels, where a label's
//! category name is read from, which attributes are presentation-only, and
//! how raw bytes are decoded. It is cheap to clone and deserializes from
//! JSON or YAML with every field optional.
//!
//! ```rust
//! use ingest::IngestConfig;
//!
//! let config = IngestConfig::default();
//! assert_eq!(config.label_tags, vec!["manual_label", "auto_label"]);
//! assert_eq!(config.category_keys, vec!["name", "labelName"]);
//! config.validate().expect("defaults are valid");
//! ```
use scraper::Selector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::TextEncoding;

/// Runtime configuration for loading annotated documents.
///
/// # Serialization
///
/// ```json
/// {
///   "label_tags": ["manual_label", "auto_label"],
///   "category_keys": ["name", "labelName"],
///   "excluded_attributes": ["style"],
///   "encodings": ["utf-8", "latin-1"],
///   "max_input_bytes": 67108864
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IngestConfig {
    /// Element names treated as labels.
    ///
    /// Labels are emitted grouped by tag in this order, and in document order
    /// within a tag; label ids follow that emission order.
    pub label_tags: Vec<String>,

    /// Attribute keys searched, in order, for a label's category name.
    ///
    /// HTML attribute names are case-insensitive, so lookups compare
    /// lower-cased keys. A label with none of these keys gets an empty
    /// category.
    pub category_keys: Vec<String>,

    /// Presentation-only attributes left out of a label's attribute map.
    pub excluded_attributes: Vec<String>,

    /// Encodings tried in order when decoding raw bytes.
    ///
    /// An empty list goes straight to the permissive UTF-8 fallback.
    pub encodings: Vec<TextEncoding>,

    /// Maximum raw input size in bytes (`None` = unlimited).
    pub max_input_bytes: Option<usize>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            label_tags: vec!["manual_label".into(), "auto_label".into()],
            category_keys: vec!["name".into(), "labelName".into()],
            excluded_attributes: vec!["style".into()],
            encodings: vec![TextEncoding::Utf8, TextEncoding::Latin1],
            max_input_bytes: Some(64 * 1024 * 1024),
        }
    }
}

/// Errors raised by [`IngestConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// No label tags configured; nothing would ever be extracted.
    #[error("ingest config must list at least one label tag")]
    NoLabelTags,

    /// A label tag is not a usable element name.
    #[error("invalid label tag {0:?}: not a valid element selector")]
    InvalidLabelTag(String),

    /// `max_input_bytes` was set to zero.
    #[error("max_input_bytes must be greater than zero when set")]
    ZeroInputLimit,
}

impl IngestConfig {
    /// Validate the configuration.
    ///
    /// Every label tag must parse as a plain element selector: `"label"`
    /// is fine, `"div.label"` or `"a, b"` are rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label_tags.is_empty() {
            return Err(ConfigError::NoLabelTags);
        }
        for tag in &self.label_tags {
            self.tag_selector(tag)?;
        }
        if self.max_input_bytes == Some(0) {
            return Err(ConfigError::ZeroInputLimit);
        }
        Ok(())
    }

    pub(crate) fn tag_selector(&self, tag: &str) -> Result<Selector, ConfigError> {
        let is_plain_name = !tag.is_empty()
            && tag
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !tag.starts_with(|c: char| c.is_ascii_digit() || c == '-');
        if !is_plain_name {
            return Err(ConfigError::InvalidLabelTag(tag.to_string()));
        }
        Selector::parse(tag).map_err(|_| ConfigError::InvalidLabelTag(tag.to_string()))
    }

    pub(crate) fn is_excluded_attribute(&self, name: &str) -> bool {
        self.excluded_attributes
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert_eq!(IngestConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_tag_list_rejected() {
        let cfg = IngestConfig {
            label_tags: vec![],
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoLabelTags));
    }

    #[test]
    fn compound_selectors_rejected() {
        for tag in ["div.label", "a, b", "", "1abc", "x y"] {
            let cfg = IngestConfig {
                label_tags: vec![tag.to_string()],
                ..Default::default()
            };
            assert_eq!(
                cfg.validate(),
                Err(ConfigError::InvalidLabelTag(tag.to_string())),
                "tag {tag:?} should be rejected"
            );
        }
    }

    #[test]
    fn zero_input_limit_rejected() {
        let cfg = IngestConfig {
            max_input_bytes: Some(0),
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroInputLimit));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: IngestConfig =
            serde_json::from_str(r#"{"label_tags": ["span_label"], "encodings": ["latin1"]}"#)
                .expect("parse");
        assert_eq!(cfg.label_tags, vec!["span_label"]);
        assert_eq!(cfg.encodings, vec![TextEncoding::Latin1]);
        assert_eq!(cfg.category_keys, IngestConfig::default().category_keys);
    }

    #[test]
    fn excluded_attributes_match_case_insensitively() {
        let cfg = IngestConfig::default();
        assert!(cfg.is_excluded_attribute("STYLE"));
        assert!(!cfg.is_excluded_attribute("name"));
    }
}
