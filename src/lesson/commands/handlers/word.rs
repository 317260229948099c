//! `## WORD: <focus word>`
//!
//! The body is narration about the focus word; it is parsed as ordinary prose
//! and attached as the element's children.

use crate::lesson::ast::Element;
use crate::lesson::commands::{BlockCommand, ParsedBlock, RenderHint, TimingHint};
use once_cell::sync::Lazy;
use regex::Regex;

static WORD_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^## WORD:\s*(.+)$").unwrap());

pub struct WordCommand;

impl BlockCommand for WordCommand {
    fn name(&self) -> &str {
        "WORD"
    }

    fn header(&self) -> &Regex {
        &WORD_HEADER
    }

    fn parse_block(&self, lines: &[String], modifier: Option<&str>) -> ParsedBlock {
        ParsedBlock::Section {
            element: Element::Word {
                focus_word: modifier.unwrap_or_default().trim_end().to_string(),
                elements: Vec::new(),
            },
            lines: lines.to_vec(),
        }
    }

    fn render_hint(&self) -> Option<RenderHint> {
        Some(RenderHint {
            tag: "div",
            class: "word-focus-header",
        })
    }

    fn default_timing(&self) -> TimingHint {
        TimingHint {
            duration: Some(1500),
            ..TimingHint::default()
        }
    }
}
