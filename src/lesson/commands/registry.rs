//! Command registry
//!
//! Maps command names to descriptors. The registry preserves registration
//! order: block headers are tried in that order and inline matches starting
//! at the same offset keep it as their tie-break. A registry is built once,
//! usually through [`CommandRegistry::with_builtins`], and then handed to a
//! [`Parser`](crate::lesson::parsing::Parser).

use super::{BlockCommand, Command, InlineCommand};
use indexmap::IndexMap;
use std::sync::Arc;

/// Registry of directive commands, keyed by case-sensitive name.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, Command>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in command set
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::handlers::register_builtins(&mut registry);
        registry
    }

    /// Register a command under `name`.
    ///
    /// A name that is already bound is overwritten in place (last write wins)
    /// and a warning is logged. The displaced command is returned.
    pub fn register(&mut self, name: impl Into<String>, command: Command) -> Option<Command> {
        let name = name.into();
        let previous = self.commands.insert(name.clone(), command);
        if previous.is_some() {
            tracing::warn!(command = %name, "command is already registered, overwriting");
        }
        previous
    }

    /// Get a command by name
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Check if a command exists
    pub fn has(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered names in registration order
    pub fn list_names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// All registered commands in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.commands.iter().map(|(name, cmd)| (name.as_str(), cmd))
    }

    /// Commands that scan within a line
    pub fn inline_commands(&self) -> Vec<Arc<dyn InlineCommand>> {
        self.commands
            .values()
            .filter_map(Command::as_inline)
            .cloned()
            .collect()
    }

    /// Commands recognized by a header line
    pub fn block_commands(&self) -> Vec<Arc<dyn BlockCommand>> {
        self.commands
            .values()
            .filter_map(Command::as_block)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Remove every command. Used to reset state between independent runs.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::ast::Segment;
    use crate::lesson::commands::handlers::{PauseCommand, QuoteCommand, StyleCommand};
    use once_cell::sync::Lazy;
    use regex::{Captures, Regex};

    static SHOUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[shout\](.*?)\[/shout\]").unwrap());

    struct ShoutCommand;

    impl InlineCommand for ShoutCommand {
        fn name(&self) -> &str {
            "shout"
        }
        fn pattern(&self) -> &Regex {
            &SHOUT
        }
        fn parse(&self, captures: &Captures<'_>) -> Segment {
            Segment::Directive {
                name: "shout".into(),
                text: Some(captures[1].to_uppercase()),
            }
        }
    }

    #[test]
    fn test_registry_creation() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.inline_commands().is_empty());
        assert!(registry.block_commands().is_empty());
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = CommandRegistry::new();
        assert!(registry
            .register("shout", Command::inline(ShoutCommand))
            .is_none());

        assert!(registry.has("shout"));
        assert_eq!(registry.get("shout").map(Command::name), Some("shout"));
        assert!(registry.get("Shout").is_none());
    }

    #[test]
    fn test_registry_overwrite_returns_previous() {
        let mut registry = CommandRegistry::new();
        registry.register("pause", Command::inline(PauseCommand));
        let previous = registry.register("pause", Command::inline(ShoutCommand));

        assert_eq!(previous.map(|c| c.name().to_string()), Some("pause".into()));
        assert_eq!(registry.get("pause").map(Command::name), Some("shout"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_overwrite_keeps_position() {
        let mut registry = CommandRegistry::new();
        registry.register("pause", Command::inline(PauseCommand));
        registry.register("ego", Command::inline(StyleCommand::ego()));
        registry.register("pause", Command::inline(ShoutCommand));

        assert_eq!(registry.list_names(), vec!["pause", "ego"]);
    }

    #[test]
    fn test_registry_filtered_views() {
        let mut registry = CommandRegistry::new();
        registry.register("pause", Command::inline(PauseCommand));
        registry.register("QUOTE", Command::block(QuoteCommand));
        registry.register("bold", Command::inline(StyleCommand::bold()));

        let inline: Vec<_> = registry
            .inline_commands()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        assert_eq!(inline, vec!["pause", "bold"]);
        assert_eq!(registry.block_commands().len(), 1);
    }

    #[test]
    fn test_registry_clear() {
        let mut registry = CommandRegistry::with_builtins();
        assert!(!registry.is_empty());
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get("pause").is_none());
    }
}
