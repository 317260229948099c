//! Document model for parsed lesson scripts
//!
//! A [`Document`] is the parser's only output: the metadata header plus the
//! ordered list of [`Scene`]s. Scenes hold [`Element`]s in document order and
//! text elements hold the [`Segment`]s decoded from one line of prose.
//!
//! Every type here is plain data. They serialize with serde so that the
//! formats module and external view layers can consume them directly; the
//! field names follow the script vocabulary (`title_en`, `focus_word`, ...).

mod document;
mod element;
mod metadata;
mod segment;

pub use document::{slugify, Document, Scene, SceneKind};
pub use element::{Bilingual, Element, ElementKind};
pub use metadata::{MetaValue, Metadata};
pub use segment::Segment;
