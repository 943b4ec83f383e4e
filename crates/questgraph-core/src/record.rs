//! Generation parameters and the on-disk record of an accepted quest.
//!
//! A record pairs provenance with the accepted graph:
//!
//! ```json
//! {
//!   "metadata": {
//!     "genre": "fantasy", "hero": "knight", "goal": "find the grail",
//!     "scene_count": 10, "max_depth": 5, "complexity": "medium",
//!     "ending_type": "single",
//!     "generated_at": "2026-10-19T12:00:00Z", "model": "mistral-large-latest",
//!     "fingerprint": "blake3:..."
//!   },
//!   "quest_data": { "scenes": [ ... ] }
//! }
//! ```
//!
//! Records are written as `quest_{genre}_{hero}_{YYYYmmdd_HHMMSS}.json`.
//! The builder accepts a record directly, so saved quests can be validated
//! again as-is.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ErrorCode;
use crate::model::QuestGraph;

/// Model name recorded when the caller does not supply one.
pub const DEFAULT_MODEL: &str = "mistral-large-latest";

/// Largest scene count the generation contract asks for.
pub const MAX_SCENE_COUNT: usize = 10;

/// Smallest scene count the generation contract asks for.
pub const MIN_SCENE_COUNT: usize = 5;

// ---------------------------------------------------------------------------
// GenerationParams
// ---------------------------------------------------------------------------

/// How intricate the generated plot should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    #[default]
    Medium,
    Complex,
}

/// Whether the quest converges on one ending or several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndingType {
    #[default]
    Single,
    Multiple,
}

/// Free-form request the generator expands into a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub genre: String,
    pub hero: String,
    pub goal: String,
    #[serde(default = "default_scene_count")]
    pub scene_count: usize,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub ending_type: EndingType,
}

const fn default_scene_count() -> usize {
    10
}

const fn default_max_depth() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    #[error("scene_count {0} is outside {MIN_SCENE_COUNT}..={MAX_SCENE_COUNT}")]
    SceneCount(usize),

    #[error("max_depth {max_depth} is outside 1..={scene_count} (the scene count)")]
    MaxDepth { max_depth: usize, scene_count: usize },
}

impl ParamsError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MissingField(_) => ErrorCode::MissingParam,
            Self::SceneCount(_) => ErrorCode::SceneCountOutOfRange,
            Self::MaxDepth { .. } => ErrorCode::MaxDepthOutOfRange,
        }
    }

    /// Remediation hint, falling back to the code's generic message.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.code();
        code.hint().unwrap_or_else(|| code.message()).to_string()
    }
}

impl GenerationParams {
    /// Parameters with every optional field at its default.
    #[must_use]
    pub fn new(genre: impl Into<String>, hero: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
            hero: hero.into(),
            goal: goal.into(),
            scene_count: default_scene_count(),
            max_depth: default_max_depth(),
            complexity: Complexity::default(),
            ending_type: EndingType::default(),
        }
    }

    /// Reject requests the generator cannot serve.
    ///
    /// # Errors
    ///
    /// Returns [`ParamsError`] for a blank genre, hero or goal, an
    /// out-of-range scene count, or a depth the scene count cannot hold.
    pub fn check(&self) -> Result<(), ParamsError> {
        for (name, value) in [("genre", &self.genre), ("hero", &self.hero), ("goal", &self.goal)] {
            if value.trim().is_empty() {
                return Err(ParamsError::MissingField(name));
            }
        }
        if !(MIN_SCENE_COUNT..=MAX_SCENE_COUNT).contains(&self.scene_count) {
            return Err(ParamsError::SceneCount(self.scene_count));
        }
        if self.max_depth == 0 || self.max_depth > self.scene_count {
            return Err(ParamsError::MaxDepth {
                max_depth: self.max_depth,
                scene_count: self.scene_count,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// QuestRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordMetadata {
    pub genre: String,
    pub hero: String,
    pub goal: String,
    pub scene_count: usize,
    pub max_depth: usize,
    pub complexity: Complexity,
    pub ending_type: EndingType,
    pub generated_at: DateTime<Utc>,
    pub model: String,
    /// [`QuestGraph::content_hash`] of the stored quest.
    pub fingerprint: String,
}

/// An accepted quest with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestRecord {
    pub metadata: RecordMetadata,
    pub quest_data: QuestGraph,
}

impl QuestRecord {
    #[must_use]
    pub fn new(
        params: &GenerationParams,
        graph: QuestGraph,
        model: impl Into<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            metadata: RecordMetadata {
                genre: params.genre.clone(),
                hero: params.hero.clone(),
                goal: params.goal.clone(),
                scene_count: params.scene_count,
                max_depth: params.max_depth,
                complexity: params.complexity,
                ending_type: params.ending_type,
                generated_at,
                model: model.into(),
                fingerprint: graph.content_hash(),
            },
            quest_data: graph,
        }
    }

    /// `quest_{genre}_{hero}_{YYYYmmdd_HHMMSS}.json`, path-safe.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "quest_{}_{}_{}.json",
            sanitize(&self.metadata.genre),
            sanitize(&self.metadata.hero),
            self.metadata.generated_at.format("%Y%m%d_%H%M%S"),
        )
    }

    /// Write the record as pretty JSON into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let path = dir.join(self.file_name());
        let body = serde_json::to_string_pretty(self).context("Failed to serialize quest record")?;
        std::fs::write(&path, body + "\n")
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(path = %path.display(), "quest record saved");
        Ok(path)
    }
}

/// Keep letters, digits, `-` and `_`; everything else becomes `_`.
fn sanitize(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
