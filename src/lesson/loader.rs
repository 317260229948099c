//! Lesson loading
//!
//! [`LessonLoader`] ties a [`ScriptSource`] to a parser: it fetches the script
//! for a lesson id, parses it and stamps the id into the document metadata.
//! The parser is built with the built-in commands the first time it is needed
//! and reused for the life of the loader.
//!
//! Parsed lessons are cached per id. A cached lesson is returned without
//! touching the source again until it is reloaded or the cache is cleared.
//!
//! Only a missing lesson is reported as an error. Everything inside the
//! script degrades leniently, see [`Parser`].

pub mod source;

pub use source::{DirectorySource, MemorySource, ScriptSource};

use crate::lesson::ast::{Document, MetaValue};
use crate::lesson::config::EngineConfig;
use crate::lesson::parsing::Parser;
use futures::future::join_all;
use indexmap::IndexMap;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

static LESSON_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^lesson(\d+)$").unwrap());

/// A lesson identifier: usually a number, but any name is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LessonId {
    Number(u32),
    Name(String),
}

impl LessonId {
    /// Storage key: the id left-padded with zeros to three characters, so
    /// `7` becomes `lesson007`.
    pub fn key(&self) -> String {
        format!("lesson{:0>3}", self.to_string())
    }

    fn to_meta(&self) -> MetaValue {
        match self {
            LessonId::Number(n) => MetaValue::Int(i64::from(*n)),
            LessonId::Name(name) => MetaValue::Str(name.clone()),
        }
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LessonId::Number(n) => write!(f, "{}", n),
            LessonId::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<u32> for LessonId {
    fn from(n: u32) -> Self {
        LessonId::Number(n)
    }
}

impl From<&str> for LessonId {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| LessonId::Name(s.to_string()))
    }
}

impl From<String> for LessonId {
    fn from(s: String) -> Self {
        LessonId::from(s.as_str())
    }
}

impl FromStr for LessonId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u32>() {
            Ok(n) if !s.starts_with('+') => LessonId::Number(n),
            _ => LessonId::Name(s.to_string()),
        })
    }
}

/// Error that can occur when loading lessons
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    /// The source has no script for the requested lesson
    NotFound { id: String, reason: String },
    /// The source exists but could not be read
    Io(String),
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderError::NotFound { id, reason } => {
                write!(f, "Lesson {} not found: {}", id, reason)
            }
            LoaderError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::Io(err.to_string())
    }
}

pub struct LessonLoader {
    source: Arc<dyn ScriptSource>,
    engine: OnceCell<Parser>,
    cache: RwLock<IndexMap<LessonId, Document>>,
}

impl LessonLoader {
    pub fn new(source: impl ScriptSource + 'static) -> Self {
        Self::from_shared(Arc::new(source))
    }

    pub fn from_shared(source: Arc<dyn ScriptSource>) -> Self {
        Self {
            source,
            engine: OnceCell::new(),
            cache: RwLock::default(),
        }
    }

    /// Use `parser` instead of one built from the built-in commands.
    pub fn with_parser(source: impl ScriptSource + 'static, parser: Parser) -> Self {
        parser.init();
        Self {
            source: Arc::new(source),
            engine: OnceCell::with_value(parser),
            cache: RwLock::default(),
        }
    }

    /// A loader reading the library directory named in `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(DirectorySource::new(
            config.library.dir.clone(),
            config.library.extension.clone(),
        ))
    }

    /// Build the parser with the built-in commands. Later calls are no-ops.
    pub fn init_engine(&self) -> &Parser {
        self.engine.get_or_init(|| {
            let parser = Parser::with_builtins();
            parser.init();
            tracing::info!(
                commands = parser.registry().len(),
                "lesson engine initialized"
            );
            parser
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.get().is_some()
    }

    /// Fetch and parse a lesson. The id is recorded as `metadata["id"]`.
    ///
    /// Served from the cache when this id was loaded before.
    pub async fn load_lesson(&self, id: impl Into<LessonId>) -> Result<Document, LoaderError> {
        let id = id.into();
        if let Some(document) = self.cached(&id) {
            tracing::trace!(lesson = %id, "lesson served from cache");
            return Ok(document);
        }
        let document = self.fetch_and_parse(&id).await?;
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, document.clone());
        Ok(document)
    }

    /// Drop any cached copy of `id` and load it from the source again.
    pub async fn reload(&self, id: impl Into<LessonId>) -> Result<Document, LoaderError> {
        let id = id.into();
        self.evict(&id);
        self.load_lesson(id).await
    }

    /// Forget every cached lesson.
    pub fn clear_cache(&self) {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        tracing::debug!(lessons = cache.len(), "lesson cache cleared");
        cache.clear();
    }

    pub fn is_cached(&self, id: impl Into<LessonId>) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id.into())
    }

    /// Number of lessons held in the cache.
    pub fn cached_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cached(&self, id: &LessonId) -> Option<Document> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn evict(&self, id: &LessonId) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(id);
    }

    async fn fetch_and_parse(&self, id: &LessonId) -> Result<Document, LoaderError> {
        let parser = self.init_engine();
        let key = id.key();

        let text = self
            .source
            .fetch(&key)
            .await?
            .ok_or_else(|| LoaderError::NotFound {
                id: id.to_string(),
                reason: format!("no script named {}", key),
            })?;

        let mut document = parser.parse(&text);
        document.metadata.insert("id".to_string(), id.to_meta());
        tracing::debug!(
            lesson = %id,
            scenes = document.scenes.len(),
            elements = document.element_count(),
            "lesson loaded"
        );
        Ok(document)
    }

    /// Whether the source has a script for `id`. Nothing is parsed.
    pub async fn lesson_exists(&self, id: impl Into<LessonId>) -> bool {
        self.source.contains(&id.into().key()).await
    }

    /// Load every id concurrently, filling the cache.
    ///
    /// Failures are logged and left out; the result holds the lessons that
    /// loaded, in the order they were requested.
    pub async fn preload_lessons<I>(&self, ids: I) -> IndexMap<LessonId, Document>
    where
        I: IntoIterator,
        I::Item: Into<LessonId>,
    {
        let ids: Vec<LessonId> = ids.into_iter().map(Into::into).collect();
        let loads = ids.iter().map(|id| self.load_lesson(id.clone()));
        let results = join_all(loads).await;

        let mut loaded = IndexMap::new();
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(document) => {
                    loaded.insert(id, document);
                }
                Err(err) => tracing::warn!(lesson = %id, error = %err, "could not preload lesson"),
            }
        }
        loaded
    }

    /// Numeric ids of every `lessonNNN` script the source holds, ascending.
    pub async fn available_lessons(&self) -> Result<Vec<u32>, LoaderError> {
        let mut ids: Vec<u32> = self
            .source
            .keys()
            .await?
            .iter()
            .filter_map(|key| LESSON_KEY.captures(key))
            .filter_map(|caps| caps[1].parse().ok())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

impl fmt::Debug for LessonLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonLoader")
            .field("initialized", &self.is_initialized())
            .field("cached", &self.cached_len())
            .finish()
    }
}
