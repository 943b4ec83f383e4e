//! Decoding an untyped candidate into a [`QuestGraph`].
//!
//! # Shape
//!
//! ```text
//! { "scenes": [ { "scene_id": "...", "text": "...",
//!                 "choices": [ { "text": "...", "next_scene": "..." } ] } ] }
//! ```
//!
//! `id` and `target` are accepted as aliases for `scene_id` and
//! `next_scene`. A persisted record (`{ "metadata": .., "quest_data": .. }`)
//! is unwrapped automatically.
//!
//! Only the shape is checked here. A missing scene `text` decodes to the
//! empty string so the text floor reports it; ids are not checked for
//! uniqueness and targets are not resolved.

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error::StructuralError;
use crate::extract::parse_candidate;
use crate::model::{Choice, QuestGraph, Scene};

const SCENE_ID_KEYS: [&str; 2] = ["scene_id", "id"];
const TARGET_KEYS: [&str; 2] = ["next_scene", "target"];

/// Decode a structured candidate.
///
/// # Errors
///
/// Returns [`StructuralError::Malformed`] naming the first offending path.
#[instrument(skip_all)]
pub fn build(candidate: &Value) -> Result<QuestGraph, StructuralError> {
    let root = as_object(candidate, "$")?;

    let (root, root_path) = match root.get("quest_data") {
        Some(inner) => (as_object(inner, "$.quest_data")?, "$.quest_data"),
        None => (root, "$"),
    };

    let scenes_path = format!("{root_path}.scenes");
    let raw_scenes = root
        .get("scenes")
        .ok_or_else(|| StructuralError::malformed(&scenes_path, "missing field"))?
        .as_array()
        .ok_or_else(|| StructuralError::malformed(&scenes_path, "expected an array"))?;

    let scenes = raw_scenes
        .iter()
        .enumerate()
        .map(|(i, raw)| decode_scene(raw, &format!("{scenes_path}[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(scenes = scenes.len(), "decoded candidate");
    Ok(QuestGraph::new(scenes))
}

/// Decode a JSON document and build it.
///
/// # Errors
///
/// Returns [`StructuralError::Malformed`] at `$` when the text is not JSON,
/// otherwise whatever [`build`] returns.
pub fn build_from_str(raw: &str) -> Result<QuestGraph, StructuralError> {
    build(&parse_candidate(raw)?)
}

fn decode_scene(raw: &Value, path: &str) -> Result<Scene, StructuralError> {
    let obj = as_object(raw, path)?;

    let id = required_str(obj, &SCENE_ID_KEYS, path)?;

    let text_path = format!("{path}.text");
    let text = match obj.get("text") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(StructuralError::malformed(text_path, "expected a string")),
    };

    let choices_path = format!("{path}.choices");
    let raw_choices = obj
        .get("choices")
        .ok_or_else(|| StructuralError::malformed(&choices_path, "missing field"))?
        .as_array()
        .ok_or_else(|| StructuralError::malformed(&choices_path, "expected an array"))?;

    let choices = raw_choices
        .iter()
        .enumerate()
        .map(|(i, raw)| decode_choice(raw, &format!("{choices_path}[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Scene { id, text, choices })
}

fn decode_choice(raw: &Value, path: &str) -> Result<Choice, StructuralError> {
    let obj = as_object(raw, path)?;
    let text = required_str(obj, &["text"], path)?;
    let target = required_str(obj, &TARGET_KEYS, path)?;
    Ok(Choice { text, target })
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, StructuralError> {
    value.as_object().ok_or_else(|| {
        StructuralError::malformed(path, format!("expected an object, found {}", kind(value)))
    })
}

/// First present key wins; the error path names the canonical key.
fn required_str(
    obj: &Map<String, Value>,
    keys: &[&str],
    path: &str,
) -> Result<String, StructuralError> {
    let canonical = keys.first().copied().unwrap_or_default();
    let field_path = format!("{path}.{canonical}");

    match keys.iter().find_map(|k| obj.get(*k)) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(StructuralError::malformed(
            field_path,
            format!("expected a string, found {}", kind(other)),
        )),
        None => Err(StructuralError::malformed(field_path, "missing field")),
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
