use thiserror::Error;

/// Errors that can occur while configuring the tokenizer.
///
/// Tokenization itself is total: every input string, including the empty
/// string, yields a (possibly empty) token sequence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonicalError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
