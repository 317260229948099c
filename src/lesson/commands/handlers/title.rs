//! `# TITLE`
//!
//! Heading strings are not authored in the body; the parser fills them from
//! the `title_en` / `title_zh` metadata keys.

use crate::lesson::ast::Element;
use crate::lesson::commands::{BlockCommand, ParsedBlock, RenderHint, TimingHint};
use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^# TITLE$").unwrap());

pub struct TitleCommand;

impl BlockCommand for TitleCommand {
    fn name(&self) -> &str {
        "TITLE"
    }

    fn header(&self) -> &Regex {
        &TITLE_HEADER
    }

    fn parse_block(&self, _lines: &[String], _modifier: Option<&str>) -> ParsedBlock {
        ParsedBlock::Element(Element::Title {
            title_en: None,
            title_zh: None,
        })
    }

    fn render_hint(&self) -> Option<RenderHint> {
        Some(RenderHint {
            tag: "div",
            class: "title-display",
        })
    }

    fn default_timing(&self) -> TimingHint {
        TimingHint {
            duration: Some(1500),
            stagger: Some(2000),
            ..TimingHint::default()
        }
    }
}
