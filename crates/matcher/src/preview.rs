//! Report-only text previews.
//!
//! Previews are computed from the same text as tokens but never feed back
//! into scoring.

/// Maximum preview length in characters, before the ellipsis marker.
pub const PREVIEW_CHARS: usize = 50;

const ELLIPSIS: &str = "...";

/// Truncate `text` to [`PREVIEW_CHARS`] characters, appending `...` when cut.
///
/// Counts Unicode scalar values, never splitting a character.
///
/// ```rust
/// use matcher::text_preview;
///
/// assert_eq!(text_preview("short"), "short");
/// let long = "x".repeat(51);
/// assert_eq!(text_preview(&long), format!("{}...", "x".repeat(50)));
/// ```
pub fn text_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => {
            let mut preview = String::with_capacity(cut + ELLIPSIS.len());
            preview.push_str(&text[..cut]);
            preview.push_str(ELLIPSIS);
            preview
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_fifty_chars_is_not_truncated() {
        let text = "y".repeat(PREVIEW_CHARS);
        assert_eq!(text_preview(&text), text);
    }

    #[test]
    fn multibyte_text_truncates_on_char_boundary() {
        let text = "é".repeat(60);
        let preview = text_preview(&text);
        assert_eq!(preview.chars().count(), PREVIEW_CHARS + ELLIPSIS.len());
        assert!(preview.ends_with(ELLIPSIS));
    }

    #[test]
    fn empty_text_stays_empty() {
        assert_eq!(text_preview(""), "");
    }
}
