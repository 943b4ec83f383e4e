//! Pulling a JSON candidate out of raw model output.
//!
//! Generators usually wrap their answer in a Markdown code fence, sometimes
//! with prose around it:
//!
//! ````text
//! Here is your quest:
//! ```json
//! { "scenes": [ ... ] }
//! ```
//! ````
//!
//! [`extract_candidate`] strips fences, keeps the outermost `{ ... }` span and
//! decodes it. Failures are reported as [`StructuralError::Malformed`] at `$`
//! so callers handle them like any other shape violation.

use serde_json::Value;
use tracing::debug;

use crate::error::StructuralError;

/// Decode the JSON object embedded in `raw`.
///
/// # Errors
///
/// Returns [`StructuralError::Malformed`] if no object is found or it does
/// not parse.
pub fn extract_candidate(raw: &str) -> Result<Value, StructuralError> {
    let unfenced = strip_code_fences(raw);
    let body = outermost_object(&unfenced)
        .ok_or_else(|| StructuralError::malformed("$", "no JSON object found in model output"))?;

    debug!(bytes = body.len(), "extracted candidate body");
    parse_candidate(body)
}

/// Decode `raw` as a JSON document, without any extraction.
///
/// # Errors
///
/// Returns [`StructuralError::Malformed`] at `$` if `raw` is not JSON.
pub fn parse_candidate(raw: &str) -> Result<Value, StructuralError> {
    serde_json::from_str(raw)
        .map_err(|e| StructuralError::malformed("$", format!("invalid JSON: {e}")))
}

/// Drop every line that opens or closes a code fence.
///
/// If a fenced block exists, only its content is kept; otherwise the text is
/// returned unchanged.
#[must_use]
pub fn strip_code_fences(raw: &str) -> String {
    let mut in_block = false;
    let mut saw_fence = false;
    let mut inside = Vec::new();

    for line in raw.lines() {
        if line.trim_start().starts_with("```") {
            saw_fence = true;
            in_block = !in_block;
            continue;
        }
        if in_block {
            inside.push(line);
        }
    }

    if saw_fence && !inside.is_empty() {
        inside.join("\n")
    } else {
        raw.to_string()
    }
}

fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_passes_through() {
        let value = extract_candidate(r#"{"scenes": []}"#).unwrap();
        assert!(value["scenes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn fenced_json_with_prose() {
        let raw = "Here is the quest:\n```json\n{\"scenes\": [{\"scene_id\": \"a\"}]}\n```\nEnjoy!";
        let value = extract_candidate(raw).unwrap();
        assert_eq!(value["scenes"][0]["scene_id"], "a");
    }

    #[test]
    fn bare_fence_without_language() {
        let raw = "```\n{\"scenes\": []}\n```";
        assert!(extract_candidate(raw).is_ok());
    }

    #[test]
    fn unterminated_fence_keeps_content() {
        let raw = "```json\n{\"scenes\": []}";
        assert!(extract_candidate(raw).is_ok());
    }

    #[test]
    fn prose_around_unfenced_object() {
        let raw = "Sure! {\"scenes\": []} Hope that helps.";
        assert!(extract_candidate(raw).is_ok());
    }

    #[test]
    fn no_object_is_malformed() {
        let err = extract_candidate("I cannot do that.").unwrap_err();
        assert!(matches!(err, StructuralError::Malformed { ref path, .. } if path == "$"));
    }

    #[test]
    fn truncated_object_is_malformed() {
        let err = extract_candidate("```json\n{\"scenes\": [ {\"scene_id\": }\n```").unwrap_err();
        match err {
            StructuralError::Malformed { reason, .. } => {
                assert!(reason.starts_with("invalid JSON"), "reason: {reason}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
