//! Inline style wrappers: `[ego]...[/ego]` and `[bold]...[/bold]`

use crate::lesson::ast::Segment;
use crate::lesson::commands::{InlineCommand, RenderHint};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static EGO_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[ego\](.*?)\[/ego\]").unwrap());
static BOLD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[bold\](.*?)\[/bold\]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Ego,
    Bold,
}

/// Wraps a span of text in a named style.
pub struct StyleCommand {
    style: Style,
}

impl StyleCommand {
    /// The ego's voice, shown italic and muted.
    pub fn ego() -> Self {
        Self { style: Style::Ego }
    }

    pub fn bold() -> Self {
        Self { style: Style::Bold }
    }
}

impl InlineCommand for StyleCommand {
    fn name(&self) -> &str {
        match self.style {
            Style::Ego => "ego",
            Style::Bold => "bold",
        }
    }

    fn pattern(&self) -> &Regex {
        match self.style {
            Style::Ego => &EGO_PATTERN,
            Style::Bold => &BOLD_PATTERN,
        }
    }

    fn parse(&self, captures: &Captures<'_>) -> Segment {
        let text = captures
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        match self.style {
            Style::Ego => Segment::Ego { text },
            Style::Bold => Segment::Bold { text },
        }
    }

    fn render_hint(&self) -> Option<RenderHint> {
        Some(match self.style {
            Style::Ego => RenderHint {
                tag: "span",
                class: "ego-voice italic",
            },
            Style::Bold => RenderHint {
                tag: "strong",
                class: "font-semibold",
            },
        })
    }
}
