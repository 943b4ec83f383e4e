//! questgraph-core library.
//!
//! Deterministic validation of generator-produced quest graphs: scenes
//! linked by player choices, a first scene as entry and a `quest_end` scene
//! that only loops to itself.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums for validation verdicts
//!   ([`error`]); `anyhow::Result` for file and config I/O.
//! - **Logging**: `tracing` macros. The core never installs a subscriber.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod model;
pub mod record;
pub mod repair;
pub mod validate;

pub use config::ValidatorConfig;
pub use error::{ErrorCode, GraphError, StructuralError, ValidationError};
pub use model::{Choice, QuestGraph, Scene, TERMINAL_ID};
pub use validate::{Accepted, Validator, validate};
