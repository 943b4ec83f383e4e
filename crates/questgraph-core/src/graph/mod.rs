//! Quest graph validation stages.
//!
//! # Pipeline
//!
//! ```text
//! serde_json::Value (untrusted generator output)
//!        ↓  build::build()
//! QuestGraph (scenes in input order, id index)
//!        ↓  check::check()
//! structurally sound graph (all targets resolve)
//!        ↓  reach::analyze()
//! DepthReport (depth, deepest path, unreachable scenes)
//! ```
//!
//! Every stage is pure and synchronous. [`crate::validate`] composes them
//! and short-circuits on the first failure.

pub mod build;
pub mod check;
pub mod reach;

pub use build::{build, build_from_str};
pub use check::check;
pub use reach::{
    DepthReport, all_paths_reach_terminal, analyze, max_branch_depth, non_terminating_paths,
};
