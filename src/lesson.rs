//! Main module for lesson library functionality

pub mod ast;
pub mod commands;
pub mod config;
pub mod formats;
pub mod inlines;
pub mod loader;
pub mod parsing;
pub mod timeline;

pub use ast::{Bilingual, Document, Element, MetaValue, Metadata, Scene, SceneKind, Segment};
pub use commands::registry::CommandRegistry;
pub use loader::{LessonId, LessonLoader, LoaderError};
pub use parsing::Parser;
pub use timeline::{PlaybackState, Sequencer};
