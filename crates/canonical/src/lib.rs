//! Label tokenization layer.
//!
//! Turns a label's text span into the normalized, order-preserving token
//! sequence that every later stage compares.
//!
//! ## What we do
//!
//! - Split text into words (maximal runs of word characters) and single
//!   punctuation marks; whitespace only separates
//! - Lower-case and trim every token, dropping tokens left empty
//! - Optionally fold Unicode compatibility forms (NFKC) first
//! - Keep byte offsets so callers can map tokens back to the span
//! - Digest whole token streams so copies of one source can be compared
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence, no errors. The same text
//! and config always produce the same tokens.

mod config;
mod error;
mod hash;
mod token;

pub use crate::config::TokenizeConfig;
pub use crate::error::CanonicalError;
pub use crate::hash::source_digest;
pub use crate::token::{
    normalized_tokens, normalized_tokens_with_config, tokenize, tokenize_with_config, Token,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_span_whitespace_is_irrelevant() {
        let raw = "\n   The   Cat\n sat.  ";
        assert_eq!(normalized_tokens(raw), normalized_tokens("The Cat sat."));
        assert_eq!(normalized_tokens(raw), vec!["the", "cat", "sat", "."]);
    }

    #[test]
    fn digest_ignores_markup_free_whitespace_differences() {
        let cfg = TokenizeConfig::default();
        let a = normalized_tokens_with_config("Hello,\n  world", &cfg);
        let b = normalized_tokens_with_config("hello , WORLD", &cfg);
        assert_eq!(source_digest(cfg.version, &a), source_digest(cfg.version, &b));
    }
}
