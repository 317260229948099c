//! Block-level elements

use super::segment::Segment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An English line paired with its Chinese rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bilingual {
    pub en: String,
    pub zh: String,
}

impl Bilingual {
    pub fn new(en: impl Into<String>, zh: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            zh: zh.into(),
        }
    }

    fn is_empty(&self) -> bool {
        self.en.is_empty() && self.zh.is_empty()
    }
}

/// A parsed, typed node of presentation content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Title {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title_en: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title_zh: Option<String>,
    },
    Text {
        content: Vec<Segment>,
    },
    Quote {
        emphasis: bool,
        quotes: Vec<Bilingual>,
    },
    Practice {
        practices: Vec<Bilingual>,
    },
    Word {
        focus_word: String,
        elements: Vec<Element>,
    },
    Closing {
        elements: Vec<Element>,
    },
    /// Top-level timing only; never handed to a renderer.
    Pause {
        duration: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Title,
    Text,
    Quote,
    Practice,
    Word,
    Closing,
    Pause,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Title => "title",
            ElementKind::Text => "text",
            ElementKind::Quote => "quote",
            ElementKind::Practice => "practice",
            ElementKind::Word => "word",
            ElementKind::Closing => "closing",
            ElementKind::Pause => "pause",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Element {
    pub fn text(content: Vec<Segment>) -> Self {
        Element::Text { content }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Title { .. } => ElementKind::Title,
            Element::Text { .. } => ElementKind::Text,
            Element::Quote { .. } => ElementKind::Quote,
            Element::Practice { .. } => ElementKind::Practice,
            Element::Word { .. } => ElementKind::Word,
            Element::Closing { .. } => ElementKind::Closing,
            Element::Pause { .. } => ElementKind::Pause,
        }
    }

    pub fn is_pause(&self) -> bool {
        matches!(self, Element::Pause { .. })
    }

    /// Nested elements of word-focus and closing sections.
    pub fn children(&self) -> &[Element] {
        match self {
            Element::Word { elements, .. } | Element::Closing { elements } => elements,
            _ => &[],
        }
    }

    /// Replace the nested elements. Ignored for kinds without children.
    pub fn set_children(&mut self, children: Vec<Element>) {
        match self {
            Element::Word { elements, .. } | Element::Closing { elements } => *elements = children,
            _ => {}
        }
    }

    /// Total visible characters of a text element, `None` for other kinds.
    pub fn text_len(&self) -> Option<usize> {
        match self {
            Element::Text { content } => Some(
                content
                    .iter()
                    .filter_map(Segment::text)
                    .map(|t| t.chars().count())
                    .sum(),
            ),
            _ => None,
        }
    }

    /// Delay set by a pause directive opening a text line, in ms.
    ///
    /// `[pause:2000] Now look.` holds the whole line back by 2000 ms. Pauses
    /// later in the line carry no timing of their own.
    pub fn leading_pause(&self) -> u64 {
        match self {
            Element::Text { content } => match content.first() {
                Some(Segment::Pause { duration }) => *duration,
                _ => 0,
            },
            _ => 0,
        }
    }

    /// Drop bilingual pairs where both sides are empty.
    pub(crate) fn prune_empty_pairs(pairs: Vec<Bilingual>) -> Vec<Bilingual> {
        pairs.into_iter().filter(|p| !p.is_empty()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_len_counts_visible_chars() {
        let el = Element::text(vec![
            Segment::raw("Hello "),
            Segment::Pause { duration: 500 },
            Segment::Ego {
                text: "嗨".into(),
            },
        ]);
        assert_eq!(el.text_len(), Some(7));
        assert_eq!(Element::Pause { duration: 1 }.text_len(), None);
    }

    #[test]
    fn leading_pause_only_counts_first_segment() {
        let leading = Element::text(vec![
            Segment::Pause { duration: 2000 },
            Segment::raw(" Now look."),
        ]);
        assert_eq!(leading.leading_pause(), 2000);

        let inner = Element::text(vec![
            Segment::raw("Now "),
            Segment::Pause { duration: 2000 },
            Segment::raw("look."),
        ]);
        assert_eq!(inner.leading_pause(), 0);
        assert_eq!(Element::Pause { duration: 700 }.leading_pause(), 0);
    }

    #[test]
    fn children_only_on_sections() {
        let mut word = Element::Word {
            focus_word: "meaning".into(),
            elements: vec![],
        };
        word.set_children(vec![Element::text(vec![Segment::raw("x")])]);
        assert_eq!(word.children().len(), 1);

        let mut quote = Element::Quote {
            emphasis: false,
            quotes: vec![],
        };
        quote.set_children(vec![Element::Pause { duration: 1 }]);
        assert!(quote.children().is_empty());
    }

    #[test]
    fn title_omits_missing_strings() {
        let json = serde_json::to_value(Element::Title {
            title_en: Some("Test".into()),
            title_zh: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"type": "title", "title_en": "Test"}));
    }
}
