//! Scene and body walk
//!
//! The walk keeps three pieces of state: the open scene, the open block
//! command with the lines accumulated for it, and a buffer of prose lines.
//!
//! - `# TITLE` flushes, then appends a title element (opening an implicit
//!   `title` scene when no scene is open yet).
//! - `# SCENE: <name>` flushes, then opens a scene with a slug id.
//! - A line matching a block command header flushes and opens that block.
//! - While a block is open every line, blank or not, belongs to it.
//! - Anything else is buffered prose. Leading blank lines are skipped; once
//!   the buffer holds text, blank lines are kept.
//!
//! Content that arrives while no scene is open is dropped.

use super::frontmatter::extract_frontmatter;
use crate::lesson::ast::{Document, Element, Metadata, Scene, Segment};
use crate::lesson::commands::registry::CommandRegistry;
use crate::lesson::commands::{BlockCommand, InlineCommand, ParsedBlock};
use crate::lesson::inlines::scan_segments;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::sync::Arc;

const TITLE_MARKER: &str = "# TITLE";

static SCENE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^# SCENE:\s*(.+)$").unwrap());

/// A prose line consisting of nothing but a pause directive.
static STANDALONE_PAUSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[pause(?::([A-Za-z0-9_]+))?\]$").unwrap());

/// Commands captured from the registry by [`Parser::init`].
struct CommandSnapshot {
    inline: Vec<Arc<dyn InlineCommand>>,
    block: Vec<Arc<dyn BlockCommand>>,
    pause: Option<Arc<dyn InlineCommand>>,
}

impl CommandSnapshot {
    fn take(registry: &CommandRegistry) -> Self {
        Self {
            inline: registry.inline_commands(),
            block: registry.block_commands(),
            pause: registry
                .get("pause")
                .and_then(|cmd| cmd.as_inline())
                .cloned(),
        }
    }
}

/// Parser for lesson scripts.
///
/// The parser owns its [`CommandRegistry`]. The filtered command lists are
/// captured once, on the first [`init`](Parser::init) or
/// [`parse`](Parser::parse); mutating the registry through
/// [`registry_mut`](Parser::registry_mut) discards the capture.
pub struct Parser {
    registry: CommandRegistry,
    snapshot: OnceCell<CommandSnapshot>,
}

impl Parser {
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            snapshot: OnceCell::new(),
        }
    }

    /// A parser over the built-in command set.
    pub fn with_builtins() -> Self {
        Self::new(CommandRegistry::with_builtins())
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Mutable access to the registry. The next parse re-captures its commands.
    pub fn registry_mut(&mut self) -> &mut CommandRegistry {
        self.snapshot.take();
        &mut self.registry
    }

    /// Capture the registry's inline and block commands. Idempotent.
    pub fn init(&self) {
        self.commands();
    }

    pub fn is_initialized(&self) -> bool {
        self.snapshot.get().is_some()
    }

    fn commands(&self) -> &CommandSnapshot {
        self.snapshot
            .get_or_init(|| CommandSnapshot::take(&self.registry))
    }

    /// Parse a full script into a document.
    pub fn parse(&self, source: &str) -> Document {
        let (metadata, body) = extract_frontmatter(source);
        let scenes = BodyWalker::new(self, &metadata).walk(body);
        Document { metadata, scenes }
    }

    /// Decode one line into segments using the inline commands.
    pub fn parse_inline(&self, line: &str) -> Vec<Segment> {
        scan_segments(line, &self.commands().inline)
    }

    /// Turn prose lines into elements.
    ///
    /// Each line is trimmed and handled on its own: blank lines produce
    /// nothing, a line holding only a pause directive becomes a pause element
    /// and every other line becomes a text element.
    pub fn parse_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Element> {
        let mut elements = Vec::new();
        for line in lines {
            let trimmed = line.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            match self.standalone_pause(trimmed) {
                Some(pause) => elements.push(pause),
                None => elements.push(Element::text(self.parse_inline(trimmed))),
            }
        }
        elements
    }

    fn standalone_pause(&self, line: &str) -> Option<Element> {
        if !STANDALONE_PAUSE.is_match(line) {
            return None;
        }
        let command = self.commands().pause.as_ref()?;
        let captures = command.pattern().captures(line)?;
        match command.parse(&captures) {
            Segment::Pause { duration } => Some(Element::Pause { duration }),
            _ => None,
        }
    }

    fn match_block(&self, line: &str) -> Option<OpenBlock> {
        self.commands().block.iter().find_map(|command| {
            command.match_header(line).map(|modifier| OpenBlock {
                command: Arc::clone(command),
                modifier: modifier.map(str::to_string),
                lines: Vec::new(),
            })
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::with_builtins()
    }
}

struct OpenBlock {
    command: Arc<dyn BlockCommand>,
    modifier: Option<String>,
    lines: Vec<String>,
}

struct BodyWalker<'p> {
    parser: &'p Parser,
    metadata: &'p Metadata,
    scenes: Vec<Scene>,
    block: Option<OpenBlock>,
    buffer: Vec<String>,
}

impl<'p> BodyWalker<'p> {
    fn new(parser: &'p Parser, metadata: &'p Metadata) -> Self {
        Self {
            parser,
            metadata,
            scenes: Vec::new(),
            block: None,
            buffer: Vec::new(),
        }
    }

    fn walk(mut self, body: &str) -> Vec<Scene> {
        for raw in body.split('\n') {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            self.step(line);
        }
        self.flush_buffer();
        self.flush_block();
        self.scenes
    }

    fn step(&mut self, line: &str) {
        if line == TITLE_MARKER {
            self.flush_buffer();
            self.flush_block();
            if self.scenes.is_empty() {
                self.scenes.push(Scene::title());
            }
            let title = self.title_element();
            self.push_element(title);
            return;
        }

        if let Some(caps) = SCENE_MARKER.captures(line) {
            self.flush_buffer();
            self.flush_block();
            let name = caps.get(1).map(|m| m.as_str().trim_end()).unwrap_or_default();
            self.scenes.push(Scene::named(name));
            return;
        }

        if let Some(block) = self.parser.match_block(line) {
            self.flush_buffer();
            self.flush_block();
            self.block = Some(block);
            return;
        }

        if let Some(block) = self.block.as_mut() {
            block.lines.push(line.to_string());
            return;
        }

        if !line.trim().is_empty() || !self.buffer.is_empty() {
            self.buffer.push(line.to_string());
        }
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.buffer);
        for element in self.parser.parse_lines(&lines) {
            self.push_element(element);
        }
    }

    fn flush_block(&mut self) {
        let Some(block) = self.block.take() else {
            return;
        };
        // A header with no body lines at all yields nothing.
        if block.lines.is_empty() {
            return;
        }

        match block
            .command
            .parse_block(&block.lines, block.modifier.as_deref())
        {
            ParsedBlock::Element(element) => {
                let element = match element {
                    Element::Title { .. } => self.title_element(),
                    other => other,
                };
                self.push_element(element);
            }
            ParsedBlock::Section { mut element, lines } => {
                element.set_children(self.parser.parse_lines(&lines));
                self.push_element(element);
            }
            ParsedBlock::Scene { scene, lines } => {
                self.scenes.push(scene);
                for element in self.parser.parse_lines(&lines) {
                    self.push_element(element);
                }
            }
        }
    }

    fn push_element(&mut self, element: Element) {
        match self.scenes.last_mut() {
            Some(scene) => scene.elements.push(element),
            None => tracing::debug!(
                kind = %element.kind(),
                "dropping element that precedes every scene"
            ),
        }
    }

    fn title_element(&self) -> Element {
        Element::Title {
            title_en: self.metadata.get("title_en").map(|v| v.to_string()),
            title_zh: self.metadata.get("title_zh").map(|v| v.to_string()),
        }
    }
}
