//! Per-scene structural invariants.
//!
//! Checks run in a fixed order and the first failure is returned:
//!
//! 1. scene count floor
//! 2. unique ids (first repeat in input order)
//! 3. `quest_end` present
//! 4. text floor for every scene
//! 5. choice cardinality (`[min, max]`, or `>= terminal_min` for `quest_end`)
//! 6. every choice has text and a target
//! 7. `quest_end` choices only self-loop
//! 8. every target names an existing scene
//!
//! Once this passes, the reachability analyzer may assume every target
//! resolves.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::config::ValidatorConfig;
use crate::error::{ChoiceBound, StructuralError};
use crate::model::{QuestGraph, TERMINAL_ID};

/// Run every structural check against `graph`.
///
/// # Errors
///
/// Returns the first [`StructuralError`] encountered.
#[instrument(skip_all, fields(scenes = graph.len()))]
pub fn check(graph: &QuestGraph, config: &ValidatorConfig) -> Result<(), StructuralError> {
    check_min_size(graph, config)?;
    check_unique_ids(graph)?;
    check_terminal_present(graph)?;
    check_text_floor(graph, config)?;
    check_choice_counts(graph, config)?;
    check_choice_completeness(graph)?;
    check_terminal_self_loop(graph)?;
    check_targets_resolve(graph)?;
    debug!("structural checks passed");
    Ok(())
}

fn check_min_size(graph: &QuestGraph, config: &ValidatorConfig) -> Result<(), StructuralError> {
    if graph.len() < config.min_scenes {
        return Err(StructuralError::TooFewScenes {
            count: graph.len(),
            min: config.min_scenes,
        });
    }
    Ok(())
}

fn check_unique_ids(graph: &QuestGraph) -> Result<(), StructuralError> {
    let mut seen = HashSet::with_capacity(graph.len());
    for scene in graph.scenes() {
        if !seen.insert(scene.id.as_str()) {
            return Err(StructuralError::DuplicateId {
                id: scene.id.clone(),
            });
        }
    }
    Ok(())
}

fn check_terminal_present(graph: &QuestGraph) -> Result<(), StructuralError> {
    if graph.contains(TERMINAL_ID) {
        Ok(())
    } else {
        Err(StructuralError::MissingTerminal)
    }
}

fn check_text_floor(graph: &QuestGraph, config: &ValidatorConfig) -> Result<(), StructuralError> {
    for scene in graph.scenes() {
        let length = scene.text_len();
        if length < config.min_text_chars {
            return Err(StructuralError::TextTooShort {
                id: scene.id.clone(),
                length,
                min: config.min_text_chars,
            });
        }
    }
    Ok(())
}

fn check_choice_counts(
    graph: &QuestGraph,
    config: &ValidatorConfig,
) -> Result<(), StructuralError> {
    for scene in graph.scenes() {
        let count = scene.choices.len();
        let bound = if scene.is_terminal() {
            (count < config.terminal_min_choices)
                .then_some(ChoiceBound::Min(config.terminal_min_choices))
        } else if count < config.min_choices {
            Some(ChoiceBound::Min(config.min_choices))
        } else if count > config.max_choices {
            Some(ChoiceBound::Max(config.max_choices))
        } else {
            None
        };

        if let Some(bound) = bound {
            return Err(StructuralError::BadChoiceCount {
                id: scene.id.clone(),
                count,
                bound,
            });
        }
    }
    Ok(())
}

fn check_choice_completeness(graph: &QuestGraph) -> Result<(), StructuralError> {
    for scene in graph.scenes() {
        for (choice_index, choice) in scene.choices.iter().enumerate() {
            if choice.text.trim().is_empty() || choice.target.trim().is_empty() {
                return Err(StructuralError::IncompleteChoice {
                    scene_id: scene.id.clone(),
                    choice_index,
                });
            }
        }
    }
    Ok(())
}

fn check_terminal_self_loop(graph: &QuestGraph) -> Result<(), StructuralError> {
    if let Some(terminal) = graph.terminal() {
        if terminal.targets().any(|t| t != TERMINAL_ID) {
            return Err(StructuralError::TerminalMustSelfLoop {
                scene_id: terminal.id.clone(),
            });
        }
    }
    Ok(())
}

fn check_targets_resolve(graph: &QuestGraph) -> Result<(), StructuralError> {
    for scene in graph.scenes() {
        if let Some(missing) = scene.targets().find(|t| !graph.contains(t)) {
            return Err(StructuralError::DanglingTarget {
                from: scene.id.clone(),
                to: missing.to_string(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
