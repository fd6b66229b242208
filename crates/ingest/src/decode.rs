//! Text decoding with a prioritized encoding fallback.
//!
//! Annotated files come from several editors, not all of which write UTF-8.
//! [`decode_text`] tries each configured encoding in order and falls back to
//! a permissive UTF-8 decode that drops undecodable bytes, so loading never
//! fails on content alone.
//!
//! ```text
//! bytes ──► utf-8 (strict) ──► latin-1 ──► ... ──► utf-8 (lossy, drop invalid)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A text encoding the loader can try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextEncoding {
    /// Strict UTF-8; any invalid sequence fails the attempt.
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    /// Never fails.
    Latin1,
}

impl TextEncoding {
    /// Canonical lower-case name, as accepted in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin-1",
        }
    }

    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => std::str::from_utf8(strip_bom(bytes))
                .ok()
                .map(str::to_owned),
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextEncoding {
    type Err = IngestError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" => Ok(TextEncoding::Latin1),
            _ => Err(IngestError::UnknownEncoding(name.to_string())),
        }
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = IngestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextEncoding> for String {
    fn from(value: TextEncoding) -> Self {
        value.as_str().to_string()
    }
}

/// Result of decoding raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// Encoding that produced `text`.
    pub encoding: TextEncoding,
    /// True when every listed encoding failed and undecodable bytes were dropped.
    pub lossy: bool,
}

/// Decode `bytes` using the first encoding in `encodings` that succeeds.
///
/// A leading UTF-8 byte-order mark is removed for UTF-8 attempts. When the
/// list is exhausted, the bytes are decoded as UTF-8 with every invalid
/// sequence discarded and the result is flagged `lossy`.
///
/// ```rust
/// use ingest::{decode_text, TextEncoding};
///
/// let latin = decode_text(b"caf\xE9", &[TextEncoding::Utf8, TextEncoding::Latin1]);
/// assert_eq!(latin.text, "café");
/// assert_eq!(latin.encoding, TextEncoding::Latin1);
///
/// let lossy = decode_text(b"caf\xE9!", &[TextEncoding::Utf8]);
/// assert_eq!(lossy.text, "caf!");
/// assert!(lossy.lossy);
/// ```
pub fn decode_text(bytes: &[u8], encodings: &[TextEncoding]) -> DecodedText {
    for &encoding in encodings {
        if let Some(text) = encoding.decode(bytes) {
            return DecodedText {
                text,
                encoding,
                lossy: false,
            };
        }
    }

    let mut text = String::with_capacity(bytes.len());
    for chunk in strip_bom(bytes).utf8_chunks() {
        text.push_str(chunk.valid());
    }
    DecodedText {
        text,
        encoding: TextEncoding::Utf8,
        lossy: true,
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: &[TextEncoding] = &[TextEncoding::Utf8, TextEncoding::Latin1];

    #[test]
    fn valid_utf8_wins_first() {
        let decoded = decode_text("naïve ✓".as_bytes(), DEFAULT);
        assert_eq!(decoded.text, "naïve ✓");
        assert_eq!(decoded.encoding, TextEncoding::Utf8);
        assert!(!decoded.lossy);
    }

    #[test]
    fn bom_is_stripped() {
        let decoded = decode_text(b"\xEF\xBB\xBF<p>hi</p>", DEFAULT);
        assert_eq!(decoded.text, "<p>hi</p>");
    }

    #[test]
    fn latin1_accepts_any_byte() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let decoded = decode_text(&bytes, &[TextEncoding::Latin1]);
        assert_eq!(decoded.text.chars().count(), 256);
        assert_eq!(decoded.encoding, TextEncoding::Latin1);
    }

    #[test]
    fn empty_encoding_list_decodes_permissively() {
        let decoded = decode_text(b"ok\xFF\xFEfine", &[]);
        assert_eq!(decoded.text, "okfine");
        assert!(decoded.lossy);
    }

    #[test]
    fn encoding_names_parse_case_insensitively() {
        assert_eq!("UTF-8".parse::<TextEncoding>(), Ok(TextEncoding::Utf8));
        assert_eq!("ISO-8859-1".parse::<TextEncoding>(), Ok(TextEncoding::Latin1));
        assert_eq!(
            "cp1252".parse::<TextEncoding>(),
            Err(IngestError::UnknownEncoding("cp1252".into()))
        );
    }

    #[test]
    fn encodings_serialize_by_name() {
        let json = serde_json::to_string(&DEFAULT).expect("serialize");
        assert_eq!(json, r#"["utf-8","latin-1"]"#);
        let back: Vec<TextEncoding> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, DEFAULT);
        assert!(serde_json::from_str::<Vec<TextEncoding>>(r#"["ebcdic"]"#).is_err());
    }
}
