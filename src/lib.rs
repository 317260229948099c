//! # lesson
//!
//! A parser and playback sequencer for lesson scripts.
//!
//! A lesson script is a small line-oriented markup: an optional `---` metadata
//! header, `# TITLE` and `# SCENE: <name>` markers, `## <NAME>` block headers and
//! prose lines carrying inline directives such as `[pause:500]` or
//! `[ego]...[/ego]`. Parsing yields a [`Document`](lesson::ast::Document) of
//! scenes and typed elements; the [`Sequencer`](lesson::timeline::Sequencer)
//! replays one scene's elements to a delivery callback on a cancellable timeline.
//!
//! File Layout
//!
//! src/lesson
//!   ├── ast          Document, scenes, elements, segments, metadata
//!   ├── commands     Command descriptors, the registry and the built-in set
//!   ├── inlines      Inline directive scanning within one line
//!   ├── parsing      Frontmatter extraction and the scene/body walk
//!   ├── timeline     Timeline building and the async sequencer
//!   ├── loader       Script sources and the lesson loader
//!   ├── formats      Document serializers (json, yaml, treeviz)
//!   └── config       Embedded defaults layered with user overrides

pub mod lesson;
