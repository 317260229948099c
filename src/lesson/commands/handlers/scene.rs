//! `# SCENE: <name>`
//!
//! The parser treats scene markers structurally before any block header is
//! tried, so this descriptor mainly documents the shape. Decoding it opens a
//! scene whose body lines are prose.

use crate::lesson::ast::Scene;
use crate::lesson::commands::{BlockCommand, ParsedBlock};
use once_cell::sync::Lazy;
use regex::Regex;

static SCENE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^# SCENE:\s*(.+)$").unwrap());

pub struct SceneCommand;

impl BlockCommand for SceneCommand {
    fn name(&self) -> &str {
        "SCENE"
    }

    fn header(&self) -> &Regex {
        &SCENE_HEADER
    }

    fn parse_block(&self, lines: &[String], modifier: Option<&str>) -> ParsedBlock {
        ParsedBlock::Scene {
            scene: Scene::named(modifier.unwrap_or_default().trim_end()),
            lines: lines.to_vec(),
        }
    }
}
