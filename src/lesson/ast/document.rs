//! Scenes and the document root

use super::element::Element;
use super::metadata::Metadata;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Implicit scene opened by a `# TITLE` marker.
    Title,
    /// Scene opened by `# SCENE: <name>`.
    Scene,
}

/// An ordered group of elements representing one presentation beat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: SceneKind,
    pub elements: Vec<Element>,
}

impl Scene {
    /// The implicit scene holding a title that appears before any named scene.
    pub fn title() -> Self {
        Self {
            id: "title".to_string(),
            name: None,
            kind: SceneKind::Title,
            elements: Vec::new(),
        }
    }

    pub fn named(name: &str) -> Self {
        Self {
            id: slugify(name),
            name: Some(name.to_string()),
            kind: SceneKind::Scene,
            elements: Vec::new(),
        }
    }
}

/// Metadata plus ordered scenes: the unit returned by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub metadata: Metadata,
    pub scenes: Vec<Scene>,
}

impl Document {
    /// Look a scene up by its position or by its id.
    pub fn find_scene(&self, key: &str) -> Option<&Scene> {
        if let Ok(index) = key.parse::<usize>() {
            if let Some(scene) = self.scenes.get(index) {
                return Some(scene);
            }
        }
        self.scenes.iter().find(|scene| scene.id == key)
    }

    pub fn element_count(&self) -> usize {
        self.scenes.iter().map(|s| s.elements.len()).sum()
    }
}

/// Lowercase the name and turn every whitespace run into one hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_whitespace_runs() {
        assert_eq!(slugify("Intro"), "intro");
        assert_eq!(slugify("The  Quiet\tMind"), "the-quiet-mind");
        assert_eq!(slugify("第一 課"), "第一-課");
    }

    #[test]
    fn find_scene_by_index_or_id() {
        let doc = Document {
            metadata: Metadata::new(),
            scenes: vec![Scene::title(), Scene::named("Deep Dive")],
        };
        assert_eq!(doc.find_scene("1").map(|s| s.id.as_str()), Some("deep-dive"));
        assert_eq!(doc.find_scene("title").map(|s| s.id.as_str()), Some("title"));
        assert!(doc.find_scene("7").is_none());
    }
}
