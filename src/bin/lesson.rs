//! Command-line interface for lesson scripts
//! Parses scripts into the various output formats and plays scenes back in the terminal.
//!
//! Usage:
//!   lesson parse `<path>` [--format `<format>`]                - Print the parsed document
//!   lesson play `<path>` [--scene `<index|id>`] [--speed `<x>`]  - Play one scene on its timeline
//!   lesson list [--dir `<dir>`]                               - List lessons in a library directory
//!   lesson commands [--patterns]                           - List the built-in commands with render and timing hints
//!
//! `--config <file>` layers a TOML file over the built-in defaults. Log output
//! is controlled with `RUST_LOG` and goes to stderr.

use clap::{Arg, ArgAction, Command};
use crossterm::style::Stylize;
use lesson::lesson::ast::{Bilingual, Element, Segment};
use lesson::lesson::config::{ConfigLoader, EngineConfig};
use lesson::lesson::formats::OutputFormat;
use lesson::lesson::loader::{DirectorySource, LessonLoader};
use lesson::lesson::timeline::{PlayOutcome, Sequencer};
use lesson::lesson::{CommandRegistry, Parser};
use std::path::PathBuf;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("lesson")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting and playing lesson scripts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a script and print the document")
                .arg(
                    Arg::new("path")
                        .help("Path to the lesson script")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (json, yaml, treeviz)")
                        .value_parser(|raw: &str| raw.parse::<OutputFormat>())
                        .default_value("treeviz"),
                ),
        )
        .subcommand(
            Command::new("play")
                .about("Play one scene of a script on its timeline")
                .arg(
                    Arg::new("path")
                        .help("Path to the lesson script")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("scene")
                        .long("scene")
                        .short('s')
                        .help("Scene index or id")
                        .default_value("0"),
                )
                .arg(
                    Arg::new("speed")
                        .long("speed")
                        .help("Playback speed factor; 2 plays twice as fast")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("1.0"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List the lessons in a library directory")
                .arg(
                    Arg::new("dir")
                        .long("dir")
                        .short('d')
                        .help("Library directory (defaults to library.dir from config)"),
                ),
        )
        .subcommand(
            Command::new("commands")
                .about("List the built-in commands")
                .arg(
                    Arg::new("patterns")
                        .long("patterns")
                        .action(ArgAction::SetTrue)
                        .help("Show each command's recognition pattern"),
                ),
        )
        .get_matches();

    let config = load_config(matches.get_one::<String>("config"));

    match matches.subcommand() {
        Some(("parse", parse_matches)) => {
            let path = parse_matches.get_one::<String>("path").unwrap();
            let format = *parse_matches.get_one::<OutputFormat>("format").unwrap();
            handle_parse_command(path, format);
        }
        Some(("play", play_matches)) => {
            let path = play_matches.get_one::<String>("path").unwrap();
            let scene = play_matches.get_one::<String>("scene").unwrap();
            let speed = *play_matches.get_one::<f64>("speed").unwrap();
            handle_play_command(&config, path, scene, speed);
        }
        Some(("list", list_matches)) => {
            let dir = list_matches.get_one::<String>("dir").map(PathBuf::from);
            handle_list_command(&config, dir);
        }
        Some(("commands", commands_matches)) => {
            handle_commands_command(commands_matches.get_flag("patterns"));
        }
        _ => unreachable!(),
    }
}

fn load_config(path: Option<&String>) -> EngineConfig {
    let mut loader = ConfigLoader::new();
    if let Some(path) = path {
        loader = loader.layer(path);
    }
    loader.load().unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {}", e);
        std::process::exit(1);
    })
}

fn read_script(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Error starting runtime: {}", e);
            std::process::exit(1);
        })
}

/// Handle the parse command
fn handle_parse_command(path: &str, format: OutputFormat) {
    let source = read_script(path);
    let doc = Parser::with_builtins().parse(&source);

    let output = format.render(&doc).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
}

/// Handle the play command
fn handle_play_command(config: &EngineConfig, path: &str, scene_key: &str, speed: f64) {
    let source = read_script(path);
    let doc = Parser::with_builtins().parse(&source);

    let Some(scene) = doc.find_scene(scene_key) else {
        eprintln!("Error: no scene '{}' in {}", scene_key, path);
        std::process::exit(1);
    };

    let sequencer = Sequencer::with_timing(config.timing.with_speed(speed));
    sequencer.load_scene(&scene.elements);

    let heading = scene.name.as_deref().unwrap_or(&scene.id);
    println!("{}", format!("== {} ==", heading).bold());

    let outcome = runtime().block_on(async {
        tokio::select! {
            outcome = sequencer.play(|_, element| print_element(element, 0)) => outcome,
            _ = tokio::signal::ctrl_c() => {
                sequencer.stop();
                PlayOutcome::Stopped
            }
        }
    });

    match outcome {
        PlayOutcome::Completed => println!("{}", "(end of scene)".dim()),
        PlayOutcome::Stopped | PlayOutcome::Superseded => {
            println!(
                "{}",
                format!("(stopped at {:.0}%)", sequencer.progress() * 100.0).dim()
            )
        }
    }
}

fn print_element(element: &Element, depth: usize) {
    let indent = "  ".repeat(depth);
    match element {
        Element::Title { title_en, title_zh } => {
            if let Some(en) = title_en {
                println!("{}{}", indent, en.as_str().bold());
            }
            if let Some(zh) = title_zh {
                println!("{}{}", indent, zh.as_str().dim());
            }
        }
        Element::Text { content } => {
            let line: String = content.iter().map(styled_segment).collect();
            println!("{}{}", indent, line);
        }
        Element::Quote { emphasis, quotes } => {
            for quote in quotes {
                let en = format!("❝ {}", quote.en);
                let en = if *emphasis {
                    en.bold().yellow().to_string()
                } else {
                    en.yellow().to_string()
                };
                println!("{}{}", indent, en);
                print_translation(&indent, quote);
            }
        }
        Element::Practice { practices } => {
            for practice in practices {
                println!("{}{}", indent, format!("✎ {}", practice.en).green());
                print_translation(&indent, practice);
            }
        }
        Element::Word {
            focus_word,
            elements,
        } => {
            println!("{}{}", indent, format!("◆ {}", focus_word).bold().magenta());
            for child in elements {
                print_element(child, depth + 1);
            }
        }
        Element::Closing { elements } => {
            for child in elements {
                print_element(child, depth);
            }
        }
        Element::Pause { .. } => {}
    }
}

fn print_translation(indent: &str, pair: &Bilingual) {
    if !pair.zh.is_empty() {
        println!("{}  {}", indent, pair.zh.as_str().dim());
    }
}

fn styled_segment(segment: &Segment) -> String {
    match segment {
        Segment::Raw { text } => text.clone(),
        Segment::Ego { text } => text.as_str().italic().cyan().to_string(),
        Segment::Bold { text } => text.as_str().bold().to_string(),
        Segment::Directive { text, .. } => text.clone().unwrap_or_default(),
        Segment::Pause { .. } => String::new(),
    }
}

/// Handle the list command
fn handle_list_command(config: &EngineConfig, dir: Option<PathBuf>) {
    let dir = dir.unwrap_or_else(|| config.library.dir.clone());
    let loader = LessonLoader::new(DirectorySource::new(
        dir.clone(),
        config.library.extension.clone(),
    ));

    let ids = runtime()
        .block_on(loader.available_lessons())
        .unwrap_or_else(|e| {
            eprintln!("Error listing {}: {}", dir.display(), e);
            std::process::exit(1);
        });

    if ids.is_empty() {
        println!("No lessons found in {}", dir.display());
        return;
    }
    println!("Lessons in {}:\n", dir.display());
    for id in ids {
        println!("  {}", id);
    }
}

/// Handle the commands command
fn handle_commands_command(show_patterns: bool) {
    let registry = CommandRegistry::with_builtins();
    println!("Built-in commands:\n");
    for (name, command) in registry.iter() {
        let hint = command
            .render_hint()
            .map(|hint| format!("<{} class=\"{}\">", hint.tag, hint.class))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<10} {:<7} {:<36} {}",
            name,
            command.kind(),
            hint,
            command.timing_hint()
        );
        if show_patterns {
            println!("             {}", command.pattern_source().dim());
        }
    }
}
