//! The verdict: build, check and analyze a candidate in one call.
//!
//! # Usage
//!
//! ```
//! use questgraph_core::validate::Validator;
//! use serde_json::json;
//!
//! let candidate = json!({"scenes": []});
//! let err = Validator::default().validate(&candidate).unwrap_err();
//! assert_eq!(err.to_string(), "quest has 0 scenes, at least 5 are required");
//! ```
//!
//! The validator never modifies its input. Repair is a separate step
//! ([`crate::repair`]) whose output is validated again.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::config::ValidatorConfig;
use crate::error::{GraphError, ValidationError};
use crate::graph::{self, DepthReport};
use crate::model::QuestGraph;

/// An accepted quest and the report describing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Accepted {
    pub graph: QuestGraph,
    pub report: DepthReport,
}

/// Runs the validation pipeline with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    #[must_use]
    pub const fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a candidate, returning the typed graph on success.
    ///
    /// # Errors
    ///
    /// Returns the first structural failure, or the graph-level failure.
    pub fn validate(&self, candidate: &Value) -> Result<QuestGraph, ValidationError> {
        self.validate_with_report(candidate).map(|accepted| accepted.graph)
    }

    /// Like [`Validator::validate`], also returning the [`DepthReport`].
    ///
    /// # Errors
    ///
    /// See [`Validator::validate`].
    #[instrument(skip_all)]
    pub fn validate_with_report(&self, candidate: &Value) -> Result<Accepted, ValidationError> {
        let graph = graph::build(candidate)?;
        self.validate_graph(graph)
    }

    /// Check and analyze an already-built graph.
    ///
    /// # Errors
    ///
    /// See [`Validator::validate`].
    pub fn validate_graph(&self, graph: QuestGraph) -> Result<Accepted, ValidationError> {
        let result = self.run_checks(&graph);
        match result {
            Ok(report) => {
                info!(
                    scenes = report.scene_count,
                    depth = report.max_branch_depth,
                    "quest accepted"
                );
                Ok(Accepted { graph, report })
            }
            Err(err) => {
                warn!(code = %err.code(), "quest rejected: {err}");
                Err(err)
            }
        }
    }

    fn run_checks(&self, graph: &QuestGraph) -> Result<DepthReport, ValidationError> {
        graph::check(graph, &self.config)?;
        let entry = entry_of(graph)?;
        Ok(graph::analyze(graph, entry, &self.config)?)
    }
}

/// The first scene in input order.
fn entry_of(graph: &QuestGraph) -> Result<&str, GraphError> {
    graph.entry_id().ok_or(GraphError::NoScenes)
}

/// Validate with the default configuration.
///
/// # Errors
///
/// See [`Validator::validate`].
pub fn validate(candidate: &Value) -> Result<QuestGraph, ValidationError> {
    Validator::default().validate(candidate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
