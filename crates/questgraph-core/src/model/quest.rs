//! Scenes, choices and the quest graph that owns them.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Identifier of the scene that ends every quest.
pub const TERMINAL_ID: &str = "quest_end";

// ---------------------------------------------------------------------------
// Choice / Scene
// ---------------------------------------------------------------------------

/// A player choice: display text plus the id of the scene it leads to.
///
/// The target is not guaranteed to exist until the structural checker has
/// accepted the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    #[serde(rename = "next_scene")]
    pub target: String,
}

impl Choice {
    pub fn new(text: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target: target.into(),
        }
    }
}

/// A node in the quest graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(rename = "scene_id")]
    pub id: String,
    pub text: String,
    pub choices: Vec<Choice>,
}

impl Scene {
    pub fn new(id: impl Into<String>, text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            choices,
        }
    }

    /// Returns `true` for the `quest_end` scene.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.id == TERMINAL_ID
    }

    /// Length of the scene text in characters.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Choice targets in display order, self-loops included.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.choices.iter().map(|c| c.target.as_str())
    }
}

// ---------------------------------------------------------------------------
// QuestGraph
// ---------------------------------------------------------------------------

/// A candidate quest: scenes in input order plus an id index.
///
/// Scenes are kept in the order the generator produced them so duplicates
/// can be reported where they occur. The index maps each id to its first
/// occurrence, so lookups are unambiguous even before the structural checker
/// has rejected duplicates.
///
/// The entry scene is the first scene; the terminal is [`TERMINAL_ID`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestGraph {
    scenes: Vec<Scene>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl QuestGraph {
    #[must_use]
    pub fn new(scenes: Vec<Scene>) -> Self {
        let mut index = HashMap::with_capacity(scenes.len());
        for (pos, scene) in scenes.iter().enumerate() {
            index.entry(scene.id.clone()).or_insert(pos);
        }
        Self { scenes, index }
    }

    /// All scenes in input order.
    #[must_use]
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Look up a scene by id (first occurrence).
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Scene> {
        self.index.get(id).and_then(|&pos| self.scenes.get(pos))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Id of the first scene, by convention the quest entry.
    #[must_use]
    pub fn entry_id(&self) -> Option<&str> {
        self.scenes.first().map(|s| s.id.as_str())
    }

    #[must_use]
    pub fn terminal(&self) -> Option<&Scene> {
        self.get(TERMINAL_ID)
    }

    /// BLAKE3 fingerprint over ids, texts and choices in input order.
    ///
    /// Two candidates with the same fingerprint validate identically.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for scene in &self.scenes {
            hasher.update(scene.id.as_bytes());
            hasher.update(b"\x00");
            hasher.update(scene.text.as_bytes());
            hasher.update(b"\x00");
            for choice in &scene.choices {
                hasher.update(choice.text.as_bytes());
                hasher.update(b"\x01");
                hasher.update(choice.target.as_bytes());
                hasher.update(b"\x00");
            }
            hasher.update(b"\x02");
        }
        format!("blake3:{}", hasher.finalize())
    }
}

impl From<Vec<Scene>> for QuestGraph {
    fn from(scenes: Vec<Scene>) -> Self {
        Self::new(scenes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
