//! End-to-end verdicts through the public API.

use questgraph_core::config::ValidatorConfig;
use questgraph_core::error::{ChoiceBound, ErrorCode, GraphError, StructuralError, ValidationError};
use questgraph_core::extract::extract_candidate;
use questgraph_core::graph::{self, DepthReport};
use questgraph_core::model::{Choice, QuestGraph, Scene};
use questgraph_core::record::{DEFAULT_MODEL, GenerationParams, QuestRecord};
use questgraph_core::repair::repair_candidate;
use questgraph_core::{Validator, validate};
use serde_json::json;

#[path = "fixtures.rs"]
mod fixtures;
use fixtures::*;

// ---------------------------------------------------------------------------
// Acceptance and idempotence
// ---------------------------------------------------------------------------

#[test]
fn accepts_well_formed_quest() {
    let accepted = Validator::default()
        .validate_with_report(&valid_candidate())
        .unwrap();

    assert_eq!(
        accepted.report,
        DepthReport {
            entry: "start".into(),
            max_branch_depth: 4,
            deepest_path: vec![
                "start".into(),
                "river".into(),
                "forest".into(),
                "ruins".into()
            ],
            scene_count: 5,
            unreachable: vec![],
        }
    );
    assert_eq!(accepted.graph.entry_id(), Some("start"));
}

#[test]
fn validating_twice_gives_the_same_verdict() {
    let good = valid_candidate();
    assert_eq!(validate(&good).unwrap(), validate(&good).unwrap());

    let mut bad = valid_candidate();
    bad["scenes"][3]["choices"][0]["next_scene"] = json!("nowhere");
    assert_eq!(validate(&bad).unwrap_err(), validate(&bad).unwrap_err());
}

#[test]
fn accepted_graph_keeps_input_order_and_text() {
    let graph = validate(&valid_candidate()).unwrap();
    let ids: Vec<&str> = graph.scenes().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["start", "forest", "river", "ruins", "quest_end"]);
    assert!(graph.scenes().iter().all(|s| s.text == TEXT));
}

// ---------------------------------------------------------------------------
// Structural rejections
// ---------------------------------------------------------------------------

#[test]
fn duplicate_rejected_at_any_position() {
    for insert_at in 0..=5 {
        let mut scenes = valid_scenes();
        scenes.insert(insert_at, scene("ruins", &["quest_end", "quest_end"]));

        let err = validate(&candidate(scenes)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Structural(StructuralError::DuplicateId { id: "ruins".into() }),
            "duplicate inserted at {insert_at}"
        );
    }
}

#[test]
fn dangling_target_rejected_even_when_all_else_holds() {
    let mut scenes = valid_scenes();
    scenes[2] = scene("river", &["ruins", "quest_end", "lighthouse"]);

    let err = validate(&candidate(scenes)).unwrap_err();
    assert_eq!(
        err,
        ValidationError::Structural(StructuralError::DanglingTarget {
            from: "river".into(),
            to: "lighthouse".into(),
        })
    );
    assert_eq!(err.code(), ErrorCode::DanglingTarget);
}

#[test]
fn terminal_linking_elsewhere_is_rejected() {
    let mut scenes = valid_scenes();
    scenes[4] = scene("quest_end", &["start"]);

    let err = validate(&candidate(scenes)).unwrap_err();
    assert_eq!(
        err,
        ValidationError::Structural(StructuralError::TerminalMustSelfLoop {
            scene_id: "quest_end".into()
        })
    );
}

#[test]
fn checks_run_in_order() {
    // Too few scenes wins over everything else.
    let err = validate(&candidate(vec![scene("a", &["a"]), scene("a", &[])])).unwrap_err();
    assert_eq!(err.code(), ErrorCode::TooFewScenes);

    // Missing terminal is reported before short text.
    let mut scenes = valid_scenes();
    scenes[4] = json!({"scene_id": "finale", "text": "short", "choices": []});
    let err = validate(&candidate(scenes)).unwrap_err();
    assert_eq!(err, ValidationError::Structural(StructuralError::MissingTerminal));

    // Choice count is reported before a dangling target.
    let mut scenes = valid_scenes();
    scenes[0] = scene("start", &["forest", "river", "ruins", "nowhere"]);
    let err = validate(&candidate(scenes)).unwrap_err();
    assert_eq!(
        err,
        ValidationError::Structural(StructuralError::BadChoiceCount {
            id: "start".into(),
            count: 4,
            bound: ChoiceBound::Max(3),
        })
    );
}

#[test]
fn text_floor_counts_characters() {
    // 49 Cyrillic characters are 98 bytes but still too short.
    let short: String = "ж".repeat(49);
    let mut scenes = valid_scenes();
    scenes[1]["text"] = json!(short);

    let err = validate(&candidate(scenes)).unwrap_err();
    assert_eq!(
        err,
        ValidationError::Structural(StructuralError::TextTooShort {
            id: "forest".into(),
            length: 49,
            min: 50,
        })
    );
}

#[test]
fn blank_choice_text_is_incomplete() {
    let mut scenes = valid_scenes();
    scenes[1]["choices"][1]["text"] = json!("   ");

    let err = validate(&candidate(scenes)).unwrap_err();
    assert_eq!(
        err,
        ValidationError::Structural(StructuralError::IncompleteChoice {
            scene_id: "forest".into(),
            choice_index: 1,
        })
    );
}

// ---------------------------------------------------------------------------
// Graph rejections
// ---------------------------------------------------------------------------

#[test]
fn two_scene_cycle_is_reported_as_non_terminating() {
    let quest = candidate(vec![
        scene("start", &["a", "quest_end"]),
        scene("a", &["b", "quest_end"]),
        scene("b", &["a", "quest_end"]),
        scene("c", &["quest_end", "quest_end"]),
        scene("quest_end", &["quest_end"]),
    ]);

    let err = validate(&quest).unwrap_err();
    assert_eq!(
        err,
        ValidationError::Graph(GraphError::NonTerminatingPaths {
            paths: vec!["start -> a -> b -> a".into()],
        })
    );
    assert!(err.to_string().contains("start -> a -> b -> a"));
}

#[test]
fn entry_straight_to_ending_has_depth_zero() {
    let quest = candidate(vec![
        scene("start", &["quest_end", "quest_end"]),
        scene("a", &["b", "quest_end"]),
        scene("b", &["c", "quest_end"]),
        scene("c", &["quest_end", "quest_end"]),
        scene("quest_end", &["quest_end"]),
    ]);

    let err = validate(&quest).unwrap_err();
    assert_eq!(
        err,
        ValidationError::Graph(GraphError::DepthTooLow {
            actual: 0,
            required: 3
        })
    );
}

#[test]
fn depth_boundary() {
    let shallow = candidate(vec![
        scene("entry", &["mid", "quest_end"]),
        scene("mid", &["quest_end", "quest_end"]),
        scene("side", &["quest_end", "quest_end"]),
        scene("other", &["quest_end", "quest_end"]),
        scene("quest_end", &["quest_end"]),
    ]);
    assert_eq!(
        validate(&shallow).unwrap_err(),
        ValidationError::Graph(GraphError::DepthTooLow {
            actual: 2,
            required: 3
        })
    );

    let deep = candidate(vec![
        scene("entry", &["mid", "quest_end"]),
        scene("mid", &["deep", "quest_end"]),
        scene("deep", &["quest_end", "quest_end"]),
        scene("side", &["quest_end", "quest_end"]),
        scene("quest_end", &["quest_end"]),
    ]);
    let accepted = Validator::default().validate_with_report(&deep).unwrap();
    assert_eq!(accepted.report.max_branch_depth, 3);
    assert_eq!(accepted.report.unreachable, vec!["side".to_string()]);
}

#[test]
fn diamond_convergence_is_not_a_cycle() {
    let graph = QuestGraph::new(vec![
        Scene::new(
            "entry",
            TEXT,
            vec![Choice::new("left", "b"), Choice::new("right", "c")],
        ),
        Scene::new("b", TEXT, vec![Choice::new("on", "quest_end")]),
        Scene::new("c", TEXT, vec![Choice::new("on", "quest_end")]),
        Scene::new("quest_end", TEXT, vec![Choice::new("stay", "quest_end")]),
    ]);
    let config = ValidatorConfig {
        min_branch_depth: 1,
        ..ValidatorConfig::default()
    };

    let report = graph::analyze(&graph, "entry", &config).unwrap();
    assert_eq!(report.max_branch_depth, 2);
    assert!(graph::all_paths_reach_terminal(&graph, "entry"));
    assert!(graph::non_terminating_paths(&graph, "entry").is_empty());
}

#[test]
fn custom_thresholds_apply() {
    let config = ValidatorConfig {
        min_branch_depth: 5,
        ..ValidatorConfig::default()
    };
    let err = Validator::new(config).validate(&valid_candidate()).unwrap_err();
    assert_eq!(
        err,
        ValidationError::Graph(GraphError::DepthTooLow {
            actual: 4,
            required: 5
        })
    );
}

// ---------------------------------------------------------------------------
// Around the validator: extraction, repair, records
// ---------------------------------------------------------------------------

#[test]
fn fenced_output_with_bare_ending_is_accepted_after_repair() {
    let mut scenes = valid_scenes();
    scenes[4] = json!({"scene_id": "quest_end", "text": TEXT, "choices": []});
    let body = serde_json::to_string_pretty(&candidate(scenes)).unwrap();
    let raw = format!("Here is the quest you asked for:\n```json\n{body}\n```\n");

    let mut extracted = extract_candidate(&raw).unwrap();
    let err = validate(&extracted).unwrap_err();
    assert_eq!(
        err,
        ValidationError::Structural(StructuralError::BadChoiceCount {
            id: "quest_end".into(),
            count: 0,
            bound: ChoiceBound::Min(1),
        })
    );

    let report = repair_candidate(&mut extracted);
    assert!(!report.is_empty());
    assert!(validate(&extracted).is_ok());
}

#[test]
fn saved_record_validates_again() {
    let dir = tempfile::tempdir().unwrap();
    let graph = validate(&valid_candidate()).unwrap();
    let params = GenerationParams::new("fantasy", "knight", "find the grail");
    let record = QuestRecord::new(&params, graph.clone(), DEFAULT_MODEL, chrono::Utc::now());

    let path = record.write_to(dir.path()).unwrap();
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

    assert_eq!(validate(&saved).unwrap(), graph);
    assert_eq!(saved["metadata"]["fingerprint"], graph.content_hash());
}
