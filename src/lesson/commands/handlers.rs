//! Built-in command set
//!
//! | Name       | Kind   | Syntax                                |
//! |------------|--------|---------------------------------------|
//! | `pause`    | inline | `[pause]`, `[pause:short]`, `[pause:2000]` |
//! | `ego`      | inline | `[ego]...[/ego]`                      |
//! | `bold`     | inline | `[bold]...[/bold]`                    |
//! | `QUOTE`    | block  | `## QUOTE`, `## QUOTE:emphasis`       |
//! | `PRACTICE` | block  | `## PRACTICE`                         |
//! | `WORD`     | block  | `## WORD: <focus word>`               |
//! | `CLOSING`  | block  | `## CLOSING`                          |
//! | `SCENE`    | block  | `# SCENE: <name>`                     |
//! | `TITLE`    | block  | `# TITLE`                             |
//!
//! To add a directive, implement [`InlineCommand`](super::InlineCommand) or
//! [`BlockCommand`](super::BlockCommand) and register it next to these.

mod closing;
mod pause;
mod practice;
mod quote;
mod scene;
mod styles;
mod title;
mod word;

pub use closing::ClosingCommand;
pub use pause::{pause_duration, PauseCommand, DEFAULT_PAUSE_MS, LONG_PAUSE_MS, SHORT_PAUSE_MS};
pub use practice::PracticeCommand;
pub use quote::QuoteCommand;
pub use scene::SceneCommand;
pub use styles::StyleCommand;
pub use title::TitleCommand;
pub use word::WordCommand;

use super::registry::CommandRegistry;
use super::Command;

/// Register every built-in command. Call once while building a registry.
pub fn register_builtins(registry: &mut CommandRegistry) {
    registry.register("pause", Command::inline(PauseCommand));
    registry.register("ego", Command::inline(StyleCommand::ego()));
    registry.register("bold", Command::inline(StyleCommand::bold()));

    registry.register("QUOTE", Command::block(QuoteCommand));
    registry.register("PRACTICE", Command::block(PracticeCommand));
    registry.register("WORD", Command::block(WordCommand));
    registry.register("CLOSING", Command::block(ClosingCommand));
    registry.register("SCENE", Command::block(SceneCommand));
    registry.register("TITLE", Command::block(TitleCommand));

    tracing::debug!(count = registry.len(), "built-in commands registered");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_full_set_in_order() {
        let registry = CommandRegistry::with_builtins();
        assert_eq!(
            registry.list_names(),
            vec!["pause", "ego", "bold", "QUOTE", "PRACTICE", "WORD", "CLOSING", "SCENE", "TITLE"]
        );
        assert_eq!(registry.inline_commands().len(), 3);
        assert_eq!(registry.block_commands().len(), 6);
    }

    #[test]
    fn registered_names_match_descriptor_names() {
        let registry = CommandRegistry::with_builtins();
        for (name, command) in registry.iter() {
            assert_eq!(name, command.name());
        }
    }
}
