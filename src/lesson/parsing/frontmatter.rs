//! Metadata header extraction

use crate::lesson::ast::{MetaValue, Metadata};
use once_cell::sync::Lazy;
use regex::Regex;

static FRONTMATTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A---\r?\n((?s:.*?))\r?\n---\r?\n").unwrap());

/// Split the metadata header off the source.
///
/// Returns the parsed metadata and the remaining body. Without a complete
/// header the metadata is empty and the body is the entire source.
pub fn extract_frontmatter(source: &str) -> (Metadata, &str) {
    match FRONTMATTER.captures(source) {
        Some(caps) => {
            let header = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let consumed = caps.get(0).map(|m| m.end()).unwrap_or(0);
            (parse_header(header), &source[consumed..])
        }
        None => (Metadata::new(), source),
    }
}

/// Parse `key: value` lines. Lines without a colon after a non-empty key are skipped.
pub fn parse_header(header: &str) -> Metadata {
    let mut metadata = Metadata::new();
    for line in header.lines() {
        let Some(colon) = line.find(':') else {
            continue;
        };
        if colon == 0 {
            continue;
        }
        let key = line[..colon].trim();
        let value = line[colon + 1..].trim();
        metadata.insert(key.to_string(), MetaValue::from_raw(value));
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_header_from_body() {
        let (metadata, body) = extract_frontmatter("---\nlesson: 1\ntitle_en: Test\n---\n# TITLE\n");
        assert_eq!(metadata.get("lesson"), Some(&MetaValue::Int(1)));
        assert_eq!(metadata.get("title_en"), Some(&"Test".into()));
        assert_eq!(body, "# TITLE\n");
    }

    #[test]
    fn value_keeps_later_colons() {
        let metadata = parse_header("time: 10:30\n: orphan\nnocolon");
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.get("time"), Some(&"10:30".into()));
    }

    #[test]
    fn missing_end_marker_is_all_body() {
        let source = "---\ntitle_en: Test\n# TITLE\n";
        let (metadata, body) = extract_frontmatter(source);
        assert!(metadata.is_empty());
        assert_eq!(body, source);
    }

    #[test]
    fn header_must_start_the_source() {
        let source = "\n---\na: b\n---\nbody";
        let (metadata, body) = extract_frontmatter(source);
        assert!(metadata.is_empty());
        assert_eq!(body, source);
    }

    #[test]
    fn accepts_crlf_line_endings() {
        let (metadata, body) = extract_frontmatter("---\r\nlesson: 12\r\n---\r\nbody");
        assert_eq!(metadata.get("lesson"), Some(&MetaValue::Int(12)));
        assert_eq!(body, "body");
    }

    #[test]
    fn later_key_overwrites_earlier() {
        let metadata = parse_header("a: 1\na: two");
        assert_eq!(metadata.get("a"), Some(&"two".into()));
    }
}
