//! Registry behavior as seen through the parser: custom commands, overrides
//! and the collision warning

use lesson::lesson::ast::{Element, Segment};
use lesson::lesson::commands::handlers::{PauseCommand, StyleCommand};
use lesson::lesson::commands::{BlockCommand, Command, InlineCommand, ParsedBlock, TimingHint};
use lesson::lesson::{CommandRegistry, Parser};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

/// Counts WARN events seen while installed.
struct WarnCounter(Arc<AtomicUsize>);

impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&count)));
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, count.load(Ordering::SeqCst))
}

static SHOUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[shout\](.*?)\[/shout\]").unwrap());
static NOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^## NOTE$").unwrap());

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
            text: captures.get(1).map(|m| m.as_str().to_uppercase()),
        }
    }
}

/// A block that wraps its lines as a closing-style section.
struct NoteCommand;

impl BlockCommand for NoteCommand {
    fn name(&self) -> &str {
        "NOTE"
    }

    fn header(&self) -> &Regex {
        &NOTE
    }

    fn parse_block(&self, lines: &[String], _modifier: Option<&str>) -> ParsedBlock {
        ParsedBlock::Section {
            element: Element::Closing {
                elements: Vec::new(),
            },
            lines: lines.to_vec(),
        }
    }
}

#[test]
fn test_collision_overwrites_and_warns_once() {
    let (registry, warnings) = count_warnings(|| {
        let mut registry = CommandRegistry::with_builtins();
        let previous = registry.register("pause", Command::inline(StyleCommand::bold()));
        assert!(matches!(previous, Some(Command::Inline(_))));
        registry
    });

    assert_eq!(warnings, 1);
    assert_eq!(registry.get("pause").map(Command::name), Some("bold"));
    assert_eq!(registry.list_names()[0], "pause");
}

#[test]
fn test_fresh_registration_does_not_warn() {
    let (_, warnings) = count_warnings(CommandRegistry::with_builtins);
    assert_eq!(warnings, 0);
}

#[test]
fn test_custom_inline_command_reaches_the_parser() {
    let mut registry = CommandRegistry::with_builtins();
    registry.register("shout", Command::inline(ShoutCommand));
    let parser = Parser::new(registry);

    let doc = parser.parse("# SCENE: s\nPlease [shout]listen[/shout] [pause:short]now.\n");
    assert_eq!(
        doc.scenes[0].elements,
        vec![Element::text(vec![
            Segment::raw("Please "),
            Segment::Directive {
                name: "shout".into(),
                text: Some("LISTEN".into())
            },
            Segment::raw(" "),
            Segment::Pause { duration: 800 },
            Segment::raw("now."),
        ])]
    );
}

#[test]
fn test_custom_block_section_children_are_prose() {
    let mut registry = CommandRegistry::with_builtins();
    registry.register("NOTE", Command::block(NoteCommand));
    let parser = Parser::new(registry);

    let doc = parser.parse("# SCENE: s\n## NOTE\nRemember [ego]this[/ego].\n\n[pause]\n");
    assert_eq!(
        doc.scenes[0].elements,
        vec![Element::Closing {
            elements: vec![
                Element::text(vec![
                    Segment::raw("Remember "),
                    Segment::Ego {
                        text: "this".into()
                    },
                    Segment::raw("."),
                ]),
                Element::Pause { duration: 1500 },
            ]
        }]
    );
}

#[test]
fn test_empty_registry_parses_everything_as_prose() {
    let parser = Parser::new(CommandRegistry::new());
    let doc = parser.parse("# SCENE: s\n## QUOTE\n> Hi\n[pause]\n");
    let texts: Vec<_> = doc.scenes[0]
        .elements
        .iter()
        .map(|e| match e {
            Element::Text { content } => content.clone(),
            other => panic!("unexpected element {:?}", other),
        })
        .collect();
    assert_eq!(
        texts,
        vec![
            vec![Segment::raw("## QUOTE")],
            vec![Segment::raw("> Hi")],
            vec![Segment::raw("[pause]")],
        ]
    );
}

#[test]
fn test_registry_mut_takes_effect_on_next_parse() {
    let mut parser = Parser::new(CommandRegistry::new());
    parser.init();
    assert_eq!(
        parser.parse_inline("[pause]"),
        vec![Segment::raw("[pause]")]
    );

    parser
        .registry_mut()
        .register("pause", Command::inline(PauseCommand));
    assert_eq!(
        parser.parse_inline("[pause]"),
        vec![Segment::Pause { duration: 1500 }]
    );
}

#[test]
fn test_clear_empties_registry() {
    let mut registry = CommandRegistry::with_builtins();
    assert!(!registry.is_empty());
    registry.clear();
    assert!(registry.is_empty());
    assert!(registry.get("QUOTE").is_none());
}

fn hint(delay: Option<u64>, duration: Option<u64>, stagger: Option<u64>) -> TimingHint {
    TimingHint {
        delay,
        duration,
        stagger,
    }
}

#[rstest]
#[case("pause", hint(Some(1500), None, None), "delay=1500ms")]
#[case("ego", hint(None, None, None), "-")]
#[case("bold", hint(None, None, None), "-")]
#[case("QUOTE", hint(None, Some(1200), Some(800)), "duration=1200ms stagger=800ms")]
#[case("PRACTICE", hint(None, Some(1000), Some(1500)), "duration=1000ms stagger=1500ms")]
#[case("WORD", hint(None, Some(1500), None), "duration=1500ms")]
#[case("CLOSING", hint(None, Some(1200), None), "duration=1200ms")]
#[case("SCENE", hint(None, None, None), "-")]
#[case("TITLE", hint(None, Some(1500), Some(2000)), "duration=1500ms stagger=2000ms")]
fn test_builtin_timing_hints(#[case] name: &str, #[case] expected: TimingHint, #[case] shown: &str) {
    let registry = CommandRegistry::with_builtins();
    let command = registry.get(name).unwrap();
    assert_eq!(command.timing_hint(), expected);
    assert_eq!(command.timing_hint().to_string(), shown);
}

#[test]
fn test_pause_hint_follows_the_segment() {
    let registry = CommandRegistry::with_builtins();
    let pause = registry.get("pause").and_then(Command::as_inline).unwrap();
    assert_eq!(
        pause.timing_hint(&Segment::Pause { duration: 3000 }).delay,
        Some(3000)
    );
}
