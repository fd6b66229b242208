use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;

use crate::config::TokenizeConfig;

/// A normalized token with the UTF-8 byte offsets of its source characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Normalized token text (lower-cased and trimmed under the default config).
    pub text: String,
    /// Byte offset (inclusive) in the tokenized text.
    pub start: usize,
    /// Byte offset (exclusive) in the tokenized text.
    pub end: usize,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

/// Word characters: letters, numerics, combining marks and connector
/// punctuation (`_`, `‿`, ...).
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch.is_mark() || ch.is_punctuation_connector()
}

/// Tokenizes a text span with the default configuration.
///
/// A token is either a maximal run of word characters or a single character
/// that is neither a word character nor whitespace. Whitespace only
/// separates tokens. Each token is lower-cased and trimmed; tokens that end
/// up empty are dropped.
///
/// ```rust
/// use canonical::tokenize;
///
/// let tokens = tokenize("The cat, sat.");
/// let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(texts, vec!["the", "cat", ",", "sat", "."]);
/// assert_eq!((tokens[1].start, tokens[1].end), (4, 7));
/// ```
pub fn tokenize(text: &str) -> Vec<Token> {
    tokenize_with_config(text, &TokenizeConfig::default())
}

/// Tokenizes a text span under an explicit configuration.
///
/// When `normalize_unicode` is set the offsets refer to the NFKC form of
/// `text`, not to `text` itself.
pub fn tokenize_with_config(text: &str, cfg: &TokenizeConfig) -> Vec<Token> {
    let source: Cow<str> = if cfg.normalize_unicode {
        Cow::Owned(text.nfkc().collect::<String>())
    } else {
        Cow::Borrowed(text)
    };
    let source = source.as_ref();

    let mut tokens = Vec::with_capacity((source.len() / 4).saturating_add(1));
    let mut word_start: Option<usize> = None;

    for (idx, ch) in source.char_indices() {
        if is_word_char(ch) {
            if word_start.is_none() {
                word_start = Some(idx);
            }
            continue;
        }

        if let Some(start) = word_start.take() {
            push_token(&mut tokens, source, start, idx, cfg);
        }
        if !ch.is_whitespace() {
            push_token(&mut tokens, source, idx, idx + ch.len_utf8(), cfg);
        }
    }

    if let Some(start) = word_start {
        push_token(&mut tokens, source, start, source.len(), cfg);
    }

    tokens
}

fn push_token(
    tokens: &mut Vec<Token>,
    source: &str,
    start: usize,
    end: usize,
    cfg: &TokenizeConfig,
) {
    let raw = source[start..end].trim();
    let text = if cfg.lowercase {
        raw.to_lowercase()
    } else {
        raw.to_string()
    };
    if text.is_empty() {
        return;
    }
    tokens.push(Token { text, start, end });
}

/// Returns only the normalized token texts for `text`, in order.
pub fn normalized_tokens(text: &str) -> Vec<String> {
    normalized_tokens_with_config(text, &TokenizeConfig::default())
}

/// Returns only the normalized token texts for `text` under `cfg`.
pub fn normalized_tokens_with_config(text: &str, cfg: &TokenizeConfig) -> Vec<String> {
    tokenize_with_config(text, cfg)
        .into_iter()
        .map(|t| t.text)
        .collect()
}
