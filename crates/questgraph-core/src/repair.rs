//! Best-effort fix-ups applied to a candidate before re-validation.
//!
//! Repair is never run by the validator. A caller opts in, repairs the raw
//! candidate, and submits the result for a fresh validation. The only fix
//! applied is the one generators need most often: a `quest_end` scene
//! produced without choices gets a single self-loop choice.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use crate::model::TERMINAL_ID;

/// Display text of the choice added to a bare terminal scene.
pub const TERMINAL_CHOICE_TEXT: &str = "Finish the quest";

/// A fix that [`repair_candidate`] applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RepairAction {
    /// `quest_end` had no choices; a self-loop was added.
    AddedTerminalChoice,
}

impl RepairAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AddedTerminalChoice => "added_terminal_choice",
        }
    }
}

/// Every fix applied to a candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    pub actions: Vec<RepairAction>,
}

impl RepairReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Repair `candidate` in place.
///
/// Candidates that are not shaped like a quest are left untouched; the
/// validator reports them.
pub fn repair_candidate(candidate: &mut Value) -> RepairReport {
    let mut report = RepairReport::default();

    let root = if candidate.get("quest_data").is_some() {
        candidate.get_mut("quest_data")
    } else {
        Some(candidate)
    };
    let Some(scenes) = root
        .and_then(|root| root.get_mut("scenes"))
        .and_then(Value::as_array_mut)
    else {
        return report;
    };

    let terminal = scenes.iter_mut().find(|scene| {
        scene
            .get("scene_id")
            .or_else(|| scene.get("id"))
            .and_then(Value::as_str)
            == Some(TERMINAL_ID)
    });

    if let Some(Value::Object(terminal)) = terminal {
        let bare = match terminal.get("choices") {
            None | Some(Value::Null) => true,
            Some(Value::Array(choices)) => choices.is_empty(),
            Some(_) => false,
        };
        if bare {
            terminal.insert(
                "choices".to_string(),
                json!([{"text": TERMINAL_CHOICE_TEXT, "next_scene": TERMINAL_ID}]),
            );
            info!("added self-loop choice to bare terminal scene");
            report.actions.push(RepairAction::AddedTerminalChoice);
        }
    }

    report
}
