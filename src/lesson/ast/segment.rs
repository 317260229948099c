//! Inline segments
//!
//! A line of prose decodes to an ordered sequence of segments: raw text runs
//! interleaved with the output of whichever inline commands matched.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    /// Text outside any directive.
    Raw { text: String },
    /// `[pause]`, `[pause:short]`, `[pause:2000]`...
    Pause { duration: u64 },
    /// `[ego]...[/ego]`, the ego's voice.
    Ego { text: String },
    /// `[bold]...[/bold]`
    Bold { text: String },
    /// Output of an inline command registered outside the built-in set.
    Directive {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

impl Segment {
    pub fn raw(text: impl Into<String>) -> Self {
        Segment::Raw { text: text.into() }
    }

    /// The command name this segment came from (`raw` for plain text).
    pub fn kind(&self) -> &str {
        match self {
            Segment::Raw { .. } => "raw",
            Segment::Pause { .. } => "pause",
            Segment::Ego { .. } => "ego",
            Segment::Bold { .. } => "bold",
            Segment::Directive { name, .. } => name,
        }
    }

    /// Visible text carried by this segment, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Segment::Raw { text } | Segment::Ego { text } | Segment::Bold { text } => Some(text),
            Segment::Directive { text, .. } => text.as_deref(),
            Segment::Pause { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(Segment::Pause { duration: 500 }).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "pause", "duration": 500}));

        let json = serde_json::to_value(Segment::raw("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "raw", "text": "hi"}));
    }

    #[test]
    fn directive_kind_is_its_name() {
        let seg = Segment::Directive {
            name: "highlight".into(),
            text: Some("x".into()),
        };
        assert_eq!(seg.kind(), "highlight");
        assert_eq!(seg.text(), Some("x"));
        assert_eq!(Segment::Pause { duration: 1 }.text(), None);
    }
}
