//! Digests over normalized token streams.
//!
//! Two annotated copies of the same source text should produce the same
//! full-document token stream no matter how their labels are placed. The
//! digest lets callers check that cheaply.
//!
//! ```text
//! SHA-256(version.to_be_bytes() || 0x00 || tok_0 || 0x1F || tok_1 || ...)
//! ```

use sha2::{Digest, Sha256};

/// Separator between tokens; cannot appear inside a normalized token.
const TOKEN_SEPARATOR: u8 = 0x1F;

/// Compute the version-aware SHA-256 digest of a normalized token stream.
///
/// ```rust
/// use canonical::{normalized_tokens, source_digest};
///
/// let a = source_digest(1, &normalized_tokens("The  <b>cat</b>"));
/// let b = source_digest(1, &normalized_tokens("the <b> CAT </b>"));
/// assert_eq!(a, b);
/// assert_ne!(a, source_digest(2, &normalized_tokens("the <b> CAT </b>")));
/// ```
pub fn source_digest<S: AsRef<str>>(version: u32, tokens: &[S]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(version.to_be_bytes());
    hasher.update([0]);
    for (idx, token) in tokens.iter().enumerate() {
        if idx > 0 {
            hasher.update([TOKEN_SEPARATOR]);
        }
        hasher.update(token.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}
