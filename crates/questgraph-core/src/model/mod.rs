//! Typed quest data: [`Scene`], [`Choice`] and the owning [`QuestGraph`].

pub mod quest;

pub use quest::{Choice, QuestGraph, Scene, TERMINAL_ID};
