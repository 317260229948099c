//! Tree view of a lesson document
//!
//! One line per node, nesting drawn with box connectors:
//!
//! ```text
//! ⧉ Greetings (2 scenes)
//! ├─ ⊤ title
//! │ └─ ★ Greetings / 问候
//! └─ § Meeting People
//!   ├─ ¶ Hello there.
//!   │ └─ ◦ Hello there.
//!   └─ ❝ Nice to meet you. / 很高兴认识你。
//! ```
//!
//! Icons
//!     Document: ⧉
//!     Scene: §, the implicit title scene: ⊤
//!     Elements: title ★, text ¶, quote ❝, practice ✎, word ◆, closing ◼, pause ⏸
//!     Pairs: ↵
//!     Segments: raw ◦, pause ⏱, ego 𝐼, bold 𝐁, anything else ○
//!
//! Labels are truncated to 30 characters.

use crate::lesson::ast::{Bilingual, Document, Element, MetaValue, Scene, SceneKind, Segment};

const LABEL_WIDTH: usize = 30;

struct Node {
    icon: &'static str,
    label: String,
    children: Vec<Node>,
}

impl Node {
    fn leaf(icon: &'static str, label: impl Into<String>) -> Self {
        Self {
            icon,
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn branch(icon: &'static str, label: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            icon,
            label: label.into(),
            children,
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn pair_label(pair: &Bilingual) -> String {
    if pair.zh.is_empty() {
        pair.en.clone()
    } else {
        format!("{} / {}", pair.en, pair.zh)
    }
}

fn segment_node(segment: &Segment) -> Node {
    match segment {
        Segment::Raw { text } => Node::leaf("◦", text.as_str()),
        Segment::Pause { duration } => Node::leaf("⏱", format!("{}ms", duration)),
        Segment::Ego { text } => Node::leaf("𝐼", text.as_str()),
        Segment::Bold { text } => Node::leaf("𝐁", text.as_str()),
        Segment::Directive { name, text } => match text {
            Some(text) => Node::leaf("○", format!("{}: {}", name, text)),
            None => Node::leaf("○", name.as_str()),
        },
    }
}

fn element_node(element: &Element) -> Node {
    match element {
        Element::Title { title_en, title_zh } => {
            let label = match (title_en, title_zh) {
                (Some(en), Some(zh)) => format!("{} / {}", en, zh),
                (Some(one), None) | (None, Some(one)) => one.clone(),
                (None, None) => "(untitled)".to_string(),
            };
            Node::leaf("★", label)
        }
        Element::Text { content } => {
            let label: String = content.iter().filter_map(Segment::text).collect();
            Node::branch("¶", label, content.iter().map(segment_node).collect())
        }
        Element::Quote { emphasis, quotes } => {
            let label = quotes.first().map(pair_label).unwrap_or_default();
            let label = if *emphasis {
                format!("{} (emphasis)", label)
            } else {
                label
            };
            let children = if quotes.len() > 1 {
                quotes.iter().map(|q| Node::leaf("↵", pair_label(q))).collect()
            } else {
                Vec::new()
            };
            Node::branch("❝", label, children)
        }
        Element::Practice { practices } => Node::branch(
            "✎",
            format!("{} lines", practices.len()),
            practices
                .iter()
                .map(|p| Node::leaf("↵", pair_label(p)))
                .collect(),
        ),
        Element::Word {
            focus_word,
            elements,
        } => Node::branch(
            "◆",
            focus_word.as_str(),
            elements.iter().map(element_node).collect(),
        ),
        Element::Closing { elements } => Node::branch(
            "◼",
            "closing",
            elements.iter().map(element_node).collect(),
        ),
        Element::Pause { duration } => Node::leaf("⏸", format!("{}ms", duration)),
    }
}

fn scene_node(scene: &Scene) -> Node {
    let icon = match scene.kind {
        SceneKind::Title => "⊤",
        SceneKind::Scene => "§",
    };
    let label = scene.name.clone().unwrap_or_else(|| scene.id.clone());
    Node::branch(icon, label, scene.elements.iter().map(element_node).collect())
}

fn format_node(node: &Node, prefix: &str, is_last: bool, output: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        node.icon,
        truncate(&node.label, LABEL_WIDTH)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        format_node(child, &child_prefix, i + 1 == count, output);
    }
}

pub fn to_treeviz_str(doc: &Document) -> String {
    let title = match doc.metadata.get("title") {
        Some(MetaValue::Str(title)) => title.clone(),
        Some(other) => other.to_string(),
        None => "Document".to_string(),
    };
    let mut output = format!(
        "⧉ {} ({} scenes)\n",
        truncate(&title, LABEL_WIDTH),
        doc.scenes.len()
    );

    let count = doc.scenes.len();
    for (i, scene) in doc.scenes.iter().enumerate() {
        format_node(&scene_node(scene), "", i + 1 == count, &mut output);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_scenes_and_elements() {
        let mut title = Scene::title();
        title.elements.push(Element::Title {
            title_en: Some("Greetings".into()),
            title_zh: Some("问候".into()),
        });
        let mut scene = Scene::named("Meeting People");
        scene
            .elements
            .push(Element::text(vec![Segment::raw("Hello there.")]));
        scene.elements.push(Element::Quote {
            emphasis: false,
            quotes: vec![Bilingual::new("Nice to meet you.", "很高兴认识你。")],
        });

        let mut doc = Document::default();
        doc.metadata
            .insert("title".into(), MetaValue::from("Greetings"));
        doc.scenes = vec![title, scene];

        let expected = "\
⧉ Greetings (2 scenes)
├─ ⊤ title
│ └─ ★ Greetings / 问候
└─ § Meeting People
  ├─ ¶ Hello there.
  │ └─ ◦ Hello there.
  └─ ❝ Nice to meet you. / 很高兴认识你。
";
        assert_eq!(to_treeviz_str(&doc), expected);
    }

    #[test]
    fn long_labels_are_truncated() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate(&"x".repeat(31), 30), format!("{}...", "x".repeat(30)));
    }

    #[test]
    fn empty_document_is_one_line() {
        assert_eq!(to_treeviz_str(&Document::default()), "⧉ Document (0 scenes)\n");
    }
}
