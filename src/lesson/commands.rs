//! Command descriptors
//!
//! A command recognizes one directive shape and decodes it. There are two
//! kinds:
//!
//! - [`InlineCommand`]s scan a single line with a pattern and turn each match
//!   into a [`Segment`] (`[pause:500]`, `[ego]...[/ego]`).
//! - [`BlockCommand`]s recognize a header line (`## QUOTE:emphasis`) and decode
//!   the lines accumulated until the next marker into an [`Element`].
//!
//! Commands are stateless decoders. They are registered by name into a
//! [`CommandRegistry`](registry::CommandRegistry), and the parser only ever
//! sees the registry's filtered views, so adding a directive never touches the
//! parser.

pub mod handlers;
pub mod registry;

use crate::lesson::ast::{Element, Scene, Segment};
use regex::{Captures, Regex};
use std::fmt;
use std::sync::Arc;

/// How a view layer is expected to present a command's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderHint {
    pub tag: &'static str,
    pub class: &'static str,
}

/// Animation parameters a command suggests for its output, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingHint {
    pub delay: Option<u64>,
    pub duration: Option<u64>,
    pub stagger: Option<u64>,
}

impl TimingHint {
    pub fn is_empty(&self) -> bool {
        self.delay.is_none() && self.duration.is_none() && self.stagger.is_none()
    }
}

impl fmt::Display for TimingHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("delay", self.delay),
            ("duration", self.duration),
            ("stagger", self.stagger),
        ]
        .iter()
        .filter_map(|(label, value)| value.map(|v| format!("{}={}ms", label, v)))
        .collect();
        if parts.is_empty() {
            f.write_str("-")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}

/// A directive recognized within a single line of prose.
pub trait InlineCommand: Send + Sync {
    fn name(&self) -> &str;

    /// Pattern run over the whole line; every non-overlapping match is a candidate.
    fn pattern(&self) -> &Regex;

    /// Decode one match into a segment.
    fn parse(&self, captures: &Captures<'_>) -> Segment;

    fn render_hint(&self) -> Option<RenderHint> {
        None
    }

    /// Timing suggested when no particular segment is at hand.
    fn default_timing(&self) -> TimingHint {
        TimingHint::default()
    }

    fn timing_hint(&self, _segment: &Segment) -> TimingHint {
        self.default_timing()
    }
}

/// Result of decoding a block's body.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedBlock {
    /// A finished element.
    Element(Element),
    /// A section whose raw lines must be parsed as prose and attached as the
    /// element's children.
    Section { element: Element, lines: Vec<String> },
    /// A new scene whose body lines are parsed as prose into it.
    Scene { scene: Scene, lines: Vec<String> },
}

/// A directive introduced by a header line and spanning the lines below it.
pub trait BlockCommand: Send + Sync {
    fn name(&self) -> &str;

    /// Pattern for the header line. Capture group 1, when present, is the modifier.
    fn header(&self) -> &Regex;

    /// Decode the accumulated body lines. Blank lines are passed through verbatim.
    fn parse_block(&self, lines: &[String], modifier: Option<&str>) -> ParsedBlock;

    fn render_hint(&self) -> Option<RenderHint> {
        None
    }

    /// Timing suggested when no particular element is at hand.
    fn default_timing(&self) -> TimingHint {
        TimingHint::default()
    }

    fn timing_hint(&self, _element: &Element) -> TimingHint {
        self.default_timing()
    }

    /// Match a header line, returning the modifier capture when it matched.
    fn match_header<'l>(&self, line: &'l str) -> Option<Option<&'l str>> {
        self.header()
            .captures(line)
            .map(|caps| caps.get(1).map(|m| m.as_str()))
    }
}

/// A registered command of either kind.
#[derive(Clone)]
pub enum Command {
    Inline(Arc<dyn InlineCommand>),
    Block(Arc<dyn BlockCommand>),
}

impl Command {
    pub fn inline<C: InlineCommand + 'static>(command: C) -> Self {
        Command::Inline(Arc::new(command))
    }

    pub fn block<C: BlockCommand + 'static>(command: C) -> Self {
        Command::Block(Arc::new(command))
    }

    pub fn name(&self) -> &str {
        match self {
            Command::Inline(cmd) => cmd.name(),
            Command::Block(cmd) => cmd.name(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Command::Inline(_) => "inline",
            Command::Block(_) => "block",
        }
    }

    /// The recognition pattern source, for listings.
    pub fn pattern_source(&self) -> &str {
        match self {
            Command::Inline(cmd) => cmd.pattern().as_str(),
            Command::Block(cmd) => cmd.header().as_str(),
        }
    }

    pub fn render_hint(&self) -> Option<RenderHint> {
        match self {
            Command::Inline(cmd) => cmd.render_hint(),
            Command::Block(cmd) => cmd.render_hint(),
        }
    }

    /// The command's suggested animation timing, for listings.
    pub fn timing_hint(&self) -> TimingHint {
        match self {
            Command::Inline(cmd) => cmd.default_timing(),
            Command::Block(cmd) => cmd.default_timing(),
        }
    }

    pub fn as_inline(&self) -> Option<&Arc<dyn InlineCommand>> {
        match self {
            Command::Inline(cmd) => Some(cmd),
            Command::Block(_) => None,
        }
    }

    pub fn as_block(&self) -> Option<&Arc<dyn BlockCommand>> {
        match self {
            Command::Block(cmd) => Some(cmd),
            Command::Inline(_) => None,
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .field("pattern", &self.pattern_source())
            .finish()
    }
}
