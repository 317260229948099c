//! Output formats for parsed lessons
//!
//! The set of formats is closed, so it is an enum rather than a lookup table:
//!
//! - `json` and `yaml`: the document's serde representation
//! - `treeviz`: one line per node, for eyeballing structure in a terminal

pub mod structured;
pub mod treeviz;

pub use structured::{to_json_str, to_yaml_str};
pub use treeviz::to_treeviz_str;

use crate::lesson::ast::Document;
use std::fmt;
use std::str::FromStr;

/// Failure to render a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A format name that none of [`OutputFormat`] answers to.
    UnknownFormat(String),
    /// The encoder rejected the document.
    Encode {
        format: OutputFormat,
        message: String,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnknownFormat(name) => write!(
                f,
                "unknown output format '{}' (expected one of: {})",
                name,
                OutputFormat::names().join(", ")
            ),
            RenderError::Encode { format, message } => {
                write!(f, "could not encode lesson as {}: {}", format, message)
            }
        }
    }
}

impl std::error::Error for RenderError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    Json,
    Yaml,
    #[default]
    Treeviz,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [
        OutputFormat::Json,
        OutputFormat::Yaml,
        OutputFormat::Treeviz,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Treeviz => "treeviz",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|format| format.name()).collect()
    }

    pub fn description(self) -> &'static str {
        match self {
            OutputFormat::Json => "pretty-printed JSON document",
            OutputFormat::Yaml => "YAML document",
            OutputFormat::Treeviz => "scene and element tree with box connectors",
        }
    }

    pub fn render(self, doc: &Document) -> Result<String, RenderError> {
        match self {
            OutputFormat::Json => to_json_str(doc),
            OutputFormat::Yaml => to_yaml_str(doc),
            OutputFormat::Treeviz => Ok(to_treeviz_str(doc)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    /// Names are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RenderError::UnknownFormat(s.to_string()))
    }
}
