//! `## QUOTE` / `## QUOTE:emphasis`
//!
//! Body lines start with `> `. A line containing CJK ideographs closes the
//! current pair as its Chinese side; any other quoted line sets the English
//! side. Lines without the `> ` prefix are ignored.

use crate::lesson::ast::{Bilingual, Element};
use crate::lesson::commands::{BlockCommand, ParsedBlock, RenderHint, TimingHint};
use once_cell::sync::Lazy;
use regex::Regex;

static QUOTE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^## QUOTE(?::([A-Za-z0-9_]+))?$").unwrap());

pub struct QuoteCommand;

pub(crate) fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

impl BlockCommand for QuoteCommand {
    fn name(&self) -> &str {
        "QUOTE"
    }

    fn header(&self) -> &Regex {
        &QUOTE_HEADER
    }

    fn parse_block(&self, lines: &[String], modifier: Option<&str>) -> ParsedBlock {
        let mut quotes = Vec::new();
        let mut current = Bilingual::default();

        for line in lines {
            let Some(text) = line.strip_prefix("> ") else {
                continue;
            };
            if contains_cjk(text) {
                current.zh = text.to_string();
                quotes.push(std::mem::take(&mut current));
            } else {
                current.en = text.to_string();
            }
        }
        quotes.push(current);

        ParsedBlock::Element(Element::Quote {
            emphasis: modifier == Some("emphasis"),
            quotes: Element::prune_empty_pairs(quotes),
        })
    }

    fn render_hint(&self) -> Option<RenderHint> {
        Some(RenderHint {
            tag: "div",
            class: "quote-block-wrapper",
        })
    }

    fn default_timing(&self) -> TimingHint {
        TimingHint {
            duration: Some(1200),
            stagger: Some(800),
            ..TimingHint::default()
        }
    }
}
