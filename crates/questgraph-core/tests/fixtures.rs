//! Candidate builders shared by the integration tests.
#![allow(dead_code)]

use serde_json::{Value, json};

/// Long enough for the default 50-character text floor.
pub const TEXT: &str = "Fog rolls over the valley as the hero studies the crossroads ahead.";

pub fn scene(id: &str, targets: &[&str]) -> Value {
    json!({
        "scene_id": id,
        "text": TEXT,
        "choices": targets
            .iter()
            .map(|t| json!({"text": format!("Head for {t}"), "next_scene": t}))
            .collect::<Vec<_>>(),
    })
}

pub fn candidate(scenes: Vec<Value>) -> Value {
    json!({ "scenes": scenes })
}

/// Five scenes, a diamond, deepest branch `start -> forest -> ruins`.
pub fn valid_scenes() -> Vec<Value> {
    vec![
        scene("start", &["forest", "river"]),
        scene("forest", &["ruins", "quest_end"]),
        scene("river", &["ruins", "quest_end", "forest"]),
        scene("ruins", &["quest_end", "quest_end"]),
        scene("quest_end", &["quest_end"]),
    ]
}

pub fn valid_candidate() -> Value {
    candidate(valid_scenes())
}
