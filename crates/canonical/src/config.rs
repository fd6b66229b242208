//! Configuration types for label tokenization.
//!
//! [`TokenizeConfig`] controls how a text span is turned into tokens. The
//! defaults reproduce the plain contract used for label matching: split into
//! words and single punctuation marks, lower-case every token, and leave the
//! Unicode representation untouched.
//!
//! # Versioning
//!
//! The `version` field is folded into [`source_digest`](crate::source_digest)
//! so digests computed under different tokenization rules never compare equal.
//! Any change to tokenization output must come with a version bump.
//!
//! # Examples
//!
//! ```rust
//! use canonical::TokenizeConfig;
//!
//! let config = TokenizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(!config.normalize_unicode);
//! assert!(config.lowercase);
//! ```
//!
//! ## Folding compatibility characters
//!
//! ```rust
//! use canonical::{normalized_tokens_with_config, TokenizeConfig};
//!
//! let config = TokenizeConfig {
//!     normalize_unicode: true,
//!     ..Default::default()
//! };
//! // U+FB01 LATIN SMALL LIGATURE FI folds to "fi" under NFKC.
//! assert_eq!(normalized_tokens_with_config("\u{FB01}le", &config), vec!["file"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CanonicalError;

/// Configuration for the tokenizer.
///
/// Cheap to clone and serde-friendly so it can be embedded in file-based
/// configuration.
///
/// ```json
/// {
///   "version": 1,
///   "normalize_unicode": false,
///   "lowercase": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TokenizeConfig {
    /// Version of the tokenization rules.
    ///
    /// Must be >= 1; version 0 is reserved and rejected by [`validate`](Self::validate).
    pub version: u32,

    /// If true, apply Unicode NFKC normalization before splitting.
    ///
    /// Token offsets then refer to the normalized text rather than the input.
    /// Off by default so offsets always point into the original span.
    pub normalize_unicode: bool,

    /// If true, lower-case every token (locale-free Unicode lowercasing).
    pub lowercase: bool,
}

impl TokenizeConfig {
    /// Reject configurations that cannot produce stable output.
    pub fn validate(&self) -> Result<(), CanonicalError> {
        if self.version == 0 {
            return Err(CanonicalError::InvalidConfig(
                "tokenize version must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for TokenizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: false,
            lowercase: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(TokenizeConfig::default().validate().is_ok());
    }

    #[test]
    fn version_zero_rejected() {
        let cfg = TokenizeConfig {
            version: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(CanonicalError::InvalidConfig(_))));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: TokenizeConfig =
            serde_json::from_str(r#"{"normalize_unicode": true}"#).expect("parse");
        assert_eq!(cfg.version, 1);
        assert!(cfg.normalize_unicode);
        assert!(cfg.lowercase);
    }
}
