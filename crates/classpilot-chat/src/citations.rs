//! Citation derivation from retrieved passages.
//!
//! Labels come from an ordered field-preference heuristic; when no structured
//! identity is present the extractor falls back to a pluggable keyword rule
//! table, and finally to a generic numbered label. Output is deterministic.

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::types::{Citation, RetrievedPassage};

/// Metadata fields checked, in order, for an explicit document title.
const TITLE_FIELDS: &[&str] = &["title", "name", "document_title"];

/// Metadata fields checked, in order, for a source URL.
const URL_FIELDS: &[&str] = &[
    "x-amz-bedrock-kb-source-uri",
    "source_uri",
    "url",
    "source_url",
    "uri",
    "source",
];

/// Generic `source` value the retrieval service fills in when a document has
/// no recorded origin; useless as a label.
const GENERIC_SOURCE: &str = "Bedrock Knowledge Base";

/// How much of a passage's text the keyword fallback scans.
const KEYWORD_SCAN_CHARS: usize = 100;

/// A best-effort labeling rule: if `needle` occurs near the start of the
/// passage text, label the citation `"{label} Source {n}"`. Needles must be
/// lowercase; the scanned text is lowercased before matching.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub needle: &'static str,
    pub label: &'static str,
}

static DEFAULT_RULES: Lazy<Vec<KeywordRule>> = Lazy::new(|| {
    vec![
        KeywordRule { needle: "filipino", label: "Filipino" },
        KeywordRule { needle: "asian", label: "Asian" },
        KeywordRule { needle: "immigration", label: "Immigration" },
    ]
});

/// Derives one numbered citation per retrieved passage.
#[derive(Debug, Clone)]
pub struct CitationExtractor {
    rules: Vec<KeywordRule>,
}

impl Default for CitationExtractor {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
        }
    }
}

impl CitationExtractor {
    /// Replace the keyword fallback rule table wholesale.
    pub fn with_rules(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Derive citations for a ranked passage list. Match numbers are a dense
    /// 1..N sequence in retrieval order.
    pub fn extract(&self, passages: &[RetrievedPassage]) -> Vec<Citation> {
        passages
            .iter()
            .enumerate()
            .map(|(rank, passage)| self.cite(passage, rank))
            .collect()
    }

    fn cite(&self, passage: &RetrievedPassage, rank: usize) -> Citation {
        let match_number = rank + 1;
        let url = find_url(passage);
        let label = self.derive_label(passage, url.as_deref(), match_number);
        let location_hint = passage
            .metadata
            .get("location")
            .and_then(Value::as_str)
            .map(str::to_string);

        Citation {
            match_number,
            label,
            url,
            location_hint,
            source_text: passage.text.clone(),
        }
    }

    fn derive_label(&self, passage: &RetrievedPassage, url: Option<&str>, n: usize) -> String {
        for field in TITLE_FIELDS {
            if let Some(title) = non_empty_str(passage.metadata.get(*field)) {
                return title.to_string();
            }
        }

        if let Some(segment) = url.and_then(last_path_segment) {
            return segment;
        }

        if let Some(source) = non_empty_str(passage.metadata.get("source")) {
            if source != GENERIC_SOURCE {
                return source.to_string();
            }
        }

        let head: String = passage
            .text
            .chars()
            .take(KEYWORD_SCAN_CHARS)
            .collect::<String>()
            .to_lowercase();
        for rule in &self.rules {
            if head.contains(rule.needle) {
                return format!("{} Source {}", rule.label, n);
            }
        }

        format!("Knowledge Base Document {}", n)
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.trim().is_empty())
}

/// First candidate metadata field (then the location URI) whose value looks
/// like a URL.
fn find_url(passage: &RetrievedPassage) -> Option<String> {
    for field in URL_FIELDS {
        if let Some(value) = non_empty_str(passage.metadata.get(*field)) {
            if value.contains("http") {
                return Some(value.to_string());
            }
        }
    }
    passage
        .location_uri
        .as_deref()
        .filter(|uri| uri.contains("http"))
        .map(str::to_string)
}

/// Last path segment of a URL, without query string or fragment.
fn last_path_segment(url: &str) -> Option<String> {
    let trimmed = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .trim_end_matches('/');
    let segment = trimmed.rsplit('/').next()?;
    // Reject the scheme/host remnant of a URL with no path.
    if segment.is_empty() || segment.contains(':') || !trimmed.contains("://") {
        return None;
    }
    if trimmed.splitn(4, '/').nth(3).is_none() {
        return None;
    }
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(text: &str, fields: &[(&str, &str)]) -> RetrievedPassage {
        let mut metadata = serde_json::Map::new();
        for (k, v) in fields {
            metadata.insert(k.to_string(), Value::String(v.to_string()));
        }
        RetrievedPassage {
            text: text.into(),
            metadata,
            location_uri: None,
        }
    }

    #[test]
    fn test_title_wins() {
        let passages = vec![passage(
            "Some passage text",
            &[
                ("title", "Ethnic Studies Framework"),
                ("x-amz-bedrock-kb-source-uri", "http://x/doc.pdf"),
            ],
        )];
        let citations = CitationExtractor::default().extract(&passages);
        assert_eq!(citations[0].match_number, 1);
        assert_eq!(citations[0].label, "Ethnic Studies Framework");
        assert_eq!(citations[0].url.as_deref(), Some("http://x/doc.pdf"));
    }

    #[test]
    fn test_url_segment_fallback() {
        let passages = vec![passage(
            "text",
            &[("x-amz-bedrock-kb-source-uri", "https://bucket.s3.amazonaws.com/guides/unit-3.pdf?versionId=7")],
        )];
        let citations = CitationExtractor::default().extract(&passages);
        assert_eq!(citations[0].label, "unit-3.pdf");
    }

    #[test]
    fn test_generic_source_skipped() {
        let passages = vec![passage(
            "A unit on Filipino American farm labor organizing in California.",
            &[("source", "Bedrock Knowledge Base")],
        )];
        let citations = CitationExtractor::default().extract(&passages);
        assert_eq!(citations[0].label, "Filipino Source 1");
        assert!(citations[0].url.is_none());
    }

    #[test]
    fn test_named_source_used() {
        let passages = vec![passage("text", &[("source", "District Curriculum Map")])];
        let citations = CitationExtractor::default().extract(&passages);
        assert_eq!(citations[0].label, "District Curriculum Map");
    }

    #[test]
    fn test_keyword_scan_limited_to_head() {
        let mut text = "x".repeat(150);
        text.push_str(" immigration");
        let passages = vec![passage(&text, &[])];
        let citations = CitationExtractor::default().extract(&passages);
        assert_eq!(citations[0].label, "Knowledge Base Document 1");
    }

    #[test]
    fn test_generic_label_numbering() {
        let passages = vec![passage("alpha", &[]), passage("beta", &[])];
        let citations = CitationExtractor::default().extract(&passages);
        assert_eq!(citations[0].label, "Knowledge Base Document 1");
        assert_eq!(citations[1].label, "Knowledge Base Document 2");
        assert_eq!(citations[1].match_number, 2);
    }

    #[test]
    fn test_url_field_order() {
        let passages = vec![passage(
            "text",
            &[
                ("url", "https://example.org/a"),
                ("x-amz-bedrock-kb-source-uri", "http://kb/b.pdf"),
            ],
        )];
        let citations = CitationExtractor::default().extract(&passages);
        assert_eq!(citations[0].url.as_deref(), Some("http://kb/b.pdf"));
    }

    #[test]
    fn test_non_url_fields_ignored() {
        let passages = vec![passage("text", &[("url", "s3-internal-key")])];
        let citations = CitationExtractor::default().extract(&passages);
        assert!(citations[0].url.is_none());
    }

    #[test]
    fn test_location_hint() {
        let passages = vec![passage("text", &[("location", "page 12")])];
        let citations = CitationExtractor::default().extract(&passages);
        assert_eq!(citations[0].location_hint.as_deref(), Some("page 12"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let passages = vec![
            passage("An Asian American studies resource.", &[("title", "T1")]),
            passage("beta", &[("x-amz-bedrock-kb-source-uri", "http://x/2")]),
        ];
        let extractor = CitationExtractor::default();
        assert_eq!(extractor.extract(&passages), extractor.extract(&passages));
    }

    #[test]
    fn test_custom_rules() {
        let extractor = CitationExtractor::with_rules(vec![KeywordRule {
            needle: "photosynthesis",
            label: "Biology",
        }]);
        let passages = vec![passage("Photosynthesis converts light into energy.", &[])];
        let citations = extractor.extract(&passages);
        assert_eq!(citations[0].label, "Biology Source 1");
    }
}
