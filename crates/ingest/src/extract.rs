//! Label extraction from annotated HTML.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html};

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::types::RawLabel;

/// Labels and whole-document text pulled out of one markup string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLabels {
    pub labels: Vec<RawLabel>,
    pub full_text: String,
}

/// Parse `html` and extract every configured label tag.
///
/// Labels are grouped by tag in `cfg.label_tags` order and appear in
/// document order within each group. Nested inline markup inside a label
/// is flattened into its text.
///
/// ```rust
/// use ingest::{extract_labels, IngestConfig};
///
/// let html = r#"<p><auto_label name="org">ACME</auto_label> sued
///     <manual_label name="person" style="color:red">Jane <b>Doe</b></manual_label>.</p>"#;
/// let out = extract_labels(html, &IngestConfig::default()).unwrap();
///
/// assert_eq!(out.labels[0].id, "label_0");
/// assert_eq!(out.labels[0].kind, "manual_label");
/// assert_eq!(out.labels[0].raw_text, "Jane Doe");
/// assert!(!out.labels[0].attributes.contains_key("style"));
/// assert_eq!(out.labels[1].category, "org");
/// ```
pub fn extract_labels(html: &str, cfg: &IngestConfig) -> Result<ExtractedLabels, IngestError> {
    let selectors = cfg
        .label_tags
        .iter()
        .map(|tag| cfg.tag_selector(tag).map(|sel| (tag, sel)))
        .collect::<Result<Vec<_>, _>>()?;

    let document = Html::parse_document(html);
    let mut labels = Vec::new();

    for (tag, selector) in &selectors {
        for element in document.select(selector) {
            let id = format!("label_{}", labels.len());
            labels.push(build_label(id, tag, element, cfg));
        }
    }

    let full_text = document.root_element().text().collect::<String>();
    Ok(ExtractedLabels { labels, full_text })
}

fn build_label(id: String, tag: &str, element: ElementRef<'_>, cfg: &IngestConfig) -> RawLabel {
    let attributes: BTreeMap<String, String> = element
        .value()
        .attrs()
        .filter(|(name, _)| !cfg.is_excluded_attribute(name))
        .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
        .collect();

    // The parser lower-cases attribute names, so `labelName` is stored as `labelname`.
    let category = cfg
        .category_keys
        .iter()
        .find_map(|key| attributes.get(&key.to_ascii_lowercase()))
        .cloned()
        .unwrap_or_default();

    RawLabel {
        id,
        kind: tag.to_string(),
        category,
        raw_text: element.text().collect(),
        attributes,
    }
}
