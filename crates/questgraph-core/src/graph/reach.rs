//! Whole-graph analysis: universal termination and branch depth.
//!
//! # Overview
//!
//! Runs after the structural checker, so every choice target is known to
//! resolve. Two properties are computed from the entry scene:
//!
//! - **Termination**: every path from the entry reaches `quest_end` without
//!   revisiting one of its own ancestors and without stopping at a scene that
//!   has no choices.
//! - **Branch depth**: the number of scenes on the longest acyclic route from
//!   the entry to `quest_end`, the ending excluded. An entry that only leads
//!   to the ending (or to itself) has no branch and depth `0`.
//!
//! # Ancestor sets
//!
//! Listing bad paths carries the set of ancestors *on the current path*,
//! copied for each branch. Two branches converging on the same downstream
//! scene (a diamond) are therefore not mistaken for a cycle; only a scene
//! reachable from itself along a single path is.
//!
//! # Complexity
//!
//! Termination is decided by a three-colour DFS in O(V+E); the exponential
//! path enumeration only runs to describe a failure. Depth is computed after
//! termination holds, so the reachable graph is acyclic and the longest route
//! per scene is memoized, also O(V+E).

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::ValidatorConfig;
use crate::error::GraphError;
use crate::model::{QuestGraph, Scene, TERMINAL_ID};

/// Separator used when rendering a path as text.
pub const PATH_SEPARATOR: &str = " -> ";

// ---------------------------------------------------------------------------
// DepthReport
// ---------------------------------------------------------------------------

/// Summary of an accepted graph's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepthReport {
    pub entry: String,
    /// Scenes on the deepest route, ending excluded.
    pub max_branch_depth: usize,
    /// The deepest route itself, entry first. Empty when depth is `0`.
    pub deepest_path: Vec<String>,
    pub scene_count: usize,
    /// Scenes no path from the entry reaches, in input order.
    pub unreachable: Vec<String>,
}

/// Analyze `graph` from `entry`.
///
/// Termination is checked before depth so a cyclic graph is always reported
/// as cyclic.
///
/// # Errors
///
/// - [`GraphError::UnknownEntry`] if `entry` is not a scene.
/// - [`GraphError::NonTerminatingPaths`] listing every bad path.
/// - [`GraphError::DepthTooLow`] if the deepest branch is too shallow.
#[instrument(skip(graph, config))]
pub fn analyze(
    graph: &QuestGraph,
    entry: &str,
    config: &ValidatorConfig,
) -> Result<DepthReport, GraphError> {
    if !graph.contains(entry) {
        return Err(GraphError::UnknownEntry {
            id: entry.to_string(),
        });
    }

    let mut color: HashMap<&str, Color> = HashMap::with_capacity(graph.len());
    if !dfs_terminates(graph, entry, &mut color) {
        let paths = non_terminating_paths(graph, entry);
        warn!(count = paths.len(), "graph has non-terminating paths");
        return Err(GraphError::NonTerminatingPaths { paths });
    }

    let deepest: Vec<String> = deepest_route(graph, entry)
        .into_iter()
        .map(str::to_string)
        .collect();
    let max_branch_depth = deepest.len();
    debug!(max_branch_depth, "computed branch depth");

    if max_branch_depth < config.min_branch_depth {
        return Err(GraphError::DepthTooLow {
            actual: max_branch_depth,
            required: config.min_branch_depth,
        });
    }

    let unreachable: Vec<String> = graph
        .scenes()
        .iter()
        .filter(|s| !s.is_terminal() && !color.contains_key(s.id.as_str()))
        .map(|s| s.id.clone())
        .collect();
    if !unreachable.is_empty() {
        debug!(?unreachable, "scenes unreachable from entry");
    }

    Ok(DepthReport {
        entry: entry.to_string(),
        max_branch_depth,
        deepest_path: deepest,
        scene_count: graph.len(),
        unreachable,
    })
}

// ---------------------------------------------------------------------------
// Branch depth
// ---------------------------------------------------------------------------

/// Depth of the deepest branch from `entry`.
///
/// On a cyclic graph, edges back onto the route being explored are ignored.
#[must_use]
pub fn max_branch_depth(graph: &QuestGraph, entry: &str) -> usize {
    deepest_route(graph, entry).len()
}

/// Memo entry for [`longest_from`].
#[derive(Debug, Clone, Copy)]
enum Step<'g> {
    /// On the DFS stack; an edge back here closes a cycle.
    Visiting,
    /// Longest route length from this scene and the scene it continues to.
    Done { len: usize, next: Option<&'g str> },
}

/// The deepest acyclic route of scenes from `entry`, ending excluded.
fn deepest_route<'g>(graph: &'g QuestGraph, entry: &'g str) -> Vec<&'g str> {
    let Some(scene) = graph.get(entry) else {
        return Vec::new();
    };
    let branches = scene.targets().any(|t| t != entry && t != TERMINAL_ID);
    if !branches {
        return Vec::new();
    }

    let mut memo: HashMap<&str, Step<'_>> = HashMap::with_capacity(graph.len());
    longest_from(graph, entry, &mut memo);

    let mut route = Vec::new();
    let mut current = Some(entry);
    while let Some(id) = current {
        let Some(Step::Done { next, .. }) = memo.get(id) else {
            break;
        };
        route.push(id);
        current = *next;
    }
    route
}

/// Length of the longest route from `id`, memoized per scene; the terminal
/// is length 0. Ties keep the earliest choice.
fn longest_from<'g>(
    graph: &'g QuestGraph,
    id: &'g str,
    memo: &mut HashMap<&'g str, Step<'g>>,
) -> usize {
    if id == TERMINAL_ID {
        return 0;
    }
    match memo.get(id) {
        Some(Step::Done { len, .. }) => return *len,
        Some(Step::Visiting) => return 0,
        None => {}
    }
    let Some(scene) = graph.get(id) else {
        return 0;
    };

    memo.insert(id, Step::Visiting);
    let mut len = 1;
    let mut next = None;
    for target in distinct_targets(scene) {
        if target == TERMINAL_ID || matches!(memo.get(target), Some(Step::Visiting)) {
            continue;
        }
        let candidate = 1 + longest_from(graph, target, memo);
        if candidate > len {
            len = candidate;
            next = Some(target);
        }
    }
    memo.insert(id, Step::Done { len, next });
    len
}

// ---------------------------------------------------------------------------
// Termination
// ---------------------------------------------------------------------------

/// Returns `true` if every path from `entry` reaches the terminal.
#[must_use]
pub fn all_paths_reach_terminal(graph: &QuestGraph, entry: &str) -> bool {
    let mut color = HashMap::with_capacity(graph.len());
    dfs_terminates(graph, entry, &mut color)
}

/// Every path from `entry` that cycles or dead-ends, as `a -> b -> a` text.
///
/// A cyclic path ends with the revisited scene; a dead-end path ends with
/// the scene that has no way forward. Paths are listed in DFS order
/// following choice order.
#[must_use]
pub fn non_terminating_paths(graph: &QuestGraph, entry: &str) -> Vec<String> {
    let mut bad = Vec::new();
    collect_bad_paths(graph, entry, &[], &BTreeSet::new(), &mut bad);
    bad
}

fn collect_bad_paths<'g>(
    graph: &'g QuestGraph,
    id: &'g str,
    trail: &[&'g str],
    ancestors: &BTreeSet<&'g str>,
    bad: &mut Vec<String>,
) {
    if id == TERMINAL_ID {
        return;
    }

    let mut path = trail.to_vec();
    path.push(id);

    if ancestors.contains(id) {
        bad.push(path.join(PATH_SEPARATOR));
        return;
    }

    let Some(scene) = graph.get(id).filter(|s| !s.choices.is_empty()) else {
        bad.push(path.join(PATH_SEPARATOR));
        return;
    };

    let mut on_path = ancestors.clone();
    on_path.insert(id);

    for target in distinct_targets(scene) {
        collect_bad_paths(graph, target, &path, &on_path, bad);
    }
}

/// DFS colors for termination checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// On the DFS stack.
    Gray,
    /// Fully explored; every path from here terminates.
    Black,
}

/// Three-colour DFS; stops at the first cycle or dead end.
///
/// On success every scene reachable from `id` (terminal aside) is Black.
fn dfs_terminates<'g>(
    graph: &'g QuestGraph,
    id: &'g str,
    color: &mut HashMap<&'g str, Color>,
) -> bool {
    if id == TERMINAL_ID {
        return true;
    }
    match color.get(id) {
        Some(Color::Gray) => return false,
        Some(Color::Black) => return true,
        None => {}
    }

    let Some(scene) = graph.get(id) else {
        return false;
    };
    if scene.choices.is_empty() {
        return false;
    }

    color.insert(id, Color::Gray);
    for target in distinct_targets(scene) {
        if !dfs_terminates(graph, target, color) {
            return false;
        }
    }
    color.insert(id, Color::Black);
    true
}

/// Choice targets in order, each once.
fn distinct_targets(scene: &Scene) -> impl Iterator<Item = &str> {
    let mut seen = HashSet::new();
    scene.targets().filter(move |t| seen.insert(*t))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
