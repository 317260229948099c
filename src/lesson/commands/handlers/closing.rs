//! `## CLOSING`

use crate::lesson::ast::Element;
use crate::lesson::commands::{BlockCommand, ParsedBlock, RenderHint, TimingHint};
use once_cell::sync::Lazy;
use regex::Regex;

static CLOSING_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^## CLOSING$").unwrap());

/// Closing section of a lesson; its body is parsed as prose children.
pub struct ClosingCommand;

impl BlockCommand for ClosingCommand {
    fn name(&self) -> &str {
        "CLOSING"
    }

    fn header(&self) -> &Regex {
        &CLOSING_HEADER
    }

    fn parse_block(&self, lines: &[String], _modifier: Option<&str>) -> ParsedBlock {
        ParsedBlock::Section {
            element: Element::Closing {
                elements: Vec::new(),
            },
            lines: lines.to_vec(),
        }
    }

    fn render_hint(&self) -> Option<RenderHint> {
        Some(RenderHint {
            tag: "div",
            class: "closing-block text-center",
        })
    }

    fn default_timing(&self) -> TimingHint {
        TimingHint {
            duration: Some(1200),
            ..TimingHint::default()
        }
    }
}
