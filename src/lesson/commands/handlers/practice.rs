//! `## PRACTICE`
//!
//! Non-blank body lines pair up as English then Chinese. A `---` line drops a
//! half-built pair and starts over.

use crate::lesson::ast::{Bilingual, Element};
use crate::lesson::commands::{BlockCommand, ParsedBlock, RenderHint, TimingHint};
use once_cell::sync::Lazy;
use regex::Regex;

static PRACTICE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^## PRACTICE$").unwrap());

pub struct PracticeCommand;

impl BlockCommand for PracticeCommand {
    fn name(&self) -> &str {
        "PRACTICE"
    }

    fn header(&self) -> &Regex {
        &PRACTICE_HEADER
    }

    fn parse_block(&self, lines: &[String], _modifier: Option<&str>) -> ParsedBlock {
        let mut practices = Vec::new();
        let mut pending: Option<String> = None;

        for line in lines {
            let trimmed = line.trim();
            if trimmed == "---" {
                pending = None;
            } else if !trimmed.is_empty() {
                match pending.take() {
                    Some(en) => practices.push(Bilingual::new(en, trimmed)),
                    None => pending = Some(trimmed.to_string()),
                }
            }
        }

        if let Some(en) = pending {
            practices.push(Bilingual::new(en, ""));
        }

        ParsedBlock::Element(Element::Practice { practices })
    }

    fn render_hint(&self) -> Option<RenderHint> {
        Some(RenderHint {
            tag: "div",
            class: "practice-block-wrapper",
        })
    }

    fn default_timing(&self) -> TimingHint {
        TimingHint {
            duration: Some(1000),
            stagger: Some(1500),
            ..TimingHint::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn practices(src: &[&str]) -> Vec<Bilingual> {
        let lines: Vec<String> = src.iter().map(|s| s.to_string()).collect();
        match PracticeCommand.parse_block(&lines, None) {
            ParsedBlock::Element(Element::Practice { practices }) => practices,
            other => panic!("Unexpected block: {:?}", other),
        }
    }

    #[test]
    fn pairs_consecutive_lines() {
        assert_eq!(
            practices(&["  I see nothing. ", "我看不見。", "", "Nothing means anything.", "沒有意義。"]),
            vec![
                Bilingual::new("I see nothing.", "我看不見。"),
                Bilingual::new("Nothing means anything.", "沒有意義。"),
            ]
        );
    }

    #[test]
    fn separator_discards_half_pair() {
        assert_eq!(
            practices(&["lonely", "---", "a", "甲"]),
            vec![Bilingual::new("a", "甲")]
        );
    }

    #[test]
    fn trailing_line_keeps_empty_chinese() {
        assert_eq!(practices(&["a", "甲", "b"]).last(), Some(&Bilingual::new("b", "")));
    }
}
