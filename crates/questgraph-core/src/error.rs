//! Error taxonomy for quest validation.
//!
//! Each stage of the pipeline has its own error enum:
//!
//! - [`StructuralError`]: shape violations from the builder and per-scene
//!   invariants from the structural checker.
//! - [`GraphError`]: whole-graph invariants from the reachability analyzer.
//!
//! [`ValidationError`] wraps both so callers of
//! [`crate::validate::validate`] handle a single type. Every kind maps to a
//! stable [`ErrorCode`] for machine-readable output. Generation parameter
//! failures ([`crate::record::ParamsError`]) share the same code table under
//! `Q4xxx`.

use std::fmt;

/// Per-scene and shape failures. The checker reports the first one found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructuralError {
    /// The candidate does not have the expected shape.
    #[error("malformed candidate at {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("quest has {count} scenes, at least {min} are required")]
    TooFewScenes { count: usize, min: usize },

    #[error("duplicate scene id '{id}'")]
    DuplicateId { id: String },

    #[error("quest has no terminal scene 'quest_end'")]
    MissingTerminal,

    /// `length` is measured in characters, not bytes.
    #[error("scene '{id}' text is {length} characters, at least {min} are required")]
    TextTooShort { id: String, length: usize, min: usize },

    #[error("scene '{id}' has {count} choices, {bound}")]
    BadChoiceCount {
        id: String,
        count: usize,
        bound: ChoiceBound,
    },

    #[error("scene '{scene_id}' choice #{choice_index} is missing its text or target")]
    IncompleteChoice {
        scene_id: String,
        choice_index: usize,
    },

    #[error("terminal scene '{scene_id}' may only link back to itself")]
    TerminalMustSelfLoop { scene_id: String },

    #[error("scene '{from}' links to unknown scene '{to}'")]
    DanglingTarget { from: String, to: String },
}

/// Which choice-count bound a scene violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceBound {
    /// Fewer choices than the lower bound.
    Min(usize),
    /// More choices than the upper bound.
    Max(usize),
}

impl fmt::Display for ChoiceBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min(min) => write!(f, "at least {min} required"),
            Self::Max(max) => write!(f, "at most {max} allowed"),
        }
    }
}

/// Whole-graph failures from the reachability analyzer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Only reachable when the scene-count floor is configured to zero.
    #[error("quest has no scenes, so there is no entry scene")]
    NoScenes,

    #[error("entry scene '{id}' does not exist")]
    UnknownEntry { id: String },

    #[error("deepest branch has depth {actual}, at least {required} is required")]
    DepthTooLow { actual: usize, required: usize },

    /// Every path that cycles or dead-ends before reaching the terminal.
    #[error("{} path(s) never reach 'quest_end': {}", .paths.len(), .paths.join("; "))]
    NonTerminatingPaths { paths: Vec<String> },
}

/// Umbrella error returned by the validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl ValidationError {
    /// Stable code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Structural(err) => err.code(),
            Self::Graph(err) => err.code(),
        }
    }

    /// Remediation hint, falling back to the code's generic message.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.code();
        code.hint().unwrap_or_else(|| code.message()).to_string()
    }
}

impl StructuralError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Malformed { .. } => ErrorCode::Malformed,
            Self::TooFewScenes { .. } => ErrorCode::TooFewScenes,
            Self::DuplicateId { .. } => ErrorCode::DuplicateId,
            Self::MissingTerminal => ErrorCode::MissingTerminal,
            Self::TextTooShort { .. } => ErrorCode::TextTooShort,
            Self::BadChoiceCount { .. } => ErrorCode::BadChoiceCount,
            Self::IncompleteChoice { .. } => ErrorCode::IncompleteChoice,
            Self::TerminalMustSelfLoop { .. } => ErrorCode::TerminalMustSelfLoop,
            Self::DanglingTarget { .. } => ErrorCode::DanglingTarget,
        }
    }

    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl GraphError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NoScenes => ErrorCode::NoScenes,
            Self::UnknownEntry { .. } => ErrorCode::UnknownEntry,
            Self::DepthTooLow { .. } => ErrorCode::DepthTooLow,
            Self::NonTerminatingPaths { .. } => ErrorCode::NonTerminatingPaths,
        }
    }
}

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Malformed,
    TooFewScenes,
    DuplicateId,
    MissingTerminal,
    TextTooShort,
    BadChoiceCount,
    IncompleteChoice,
    TerminalMustSelfLoop,
    DanglingTarget,
    UnknownEntry,
    DepthTooLow,
    NonTerminatingPaths,
    NoScenes,
    MissingParam,
    SceneCountOutOfRange,
    MaxDepthOutOfRange,
}

impl ErrorCode {
    /// Stable code identifier (`Q####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Malformed => "Q1001",
            Self::TooFewScenes => "Q2001",
            Self::DuplicateId => "Q2002",
            Self::MissingTerminal => "Q2003",
            Self::TextTooShort => "Q2004",
            Self::BadChoiceCount => "Q2005",
            Self::IncompleteChoice => "Q2006",
            Self::TerminalMustSelfLoop => "Q2007",
            Self::DanglingTarget => "Q2008",
            Self::UnknownEntry => "Q3001",
            Self::DepthTooLow => "Q3002",
            Self::NonTerminatingPaths => "Q3003",
            Self::NoScenes => "Q3004",
            Self::MissingParam => "Q4001",
            Self::SceneCountOutOfRange => "Q4002",
            Self::MaxDepthOutOfRange => "Q4003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Malformed => "Malformed quest candidate",
            Self::TooFewScenes => "Too few scenes",
            Self::DuplicateId => "Duplicate scene id",
            Self::MissingTerminal => "Missing terminal scene",
            Self::TextTooShort => "Scene text too short",
            Self::BadChoiceCount => "Bad choice count",
            Self::IncompleteChoice => "Incomplete choice",
            Self::TerminalMustSelfLoop => "Terminal scene must self-loop",
            Self::DanglingTarget => "Dangling choice target",
            Self::UnknownEntry => "Unknown entry scene",
            Self::DepthTooLow => "Branch depth too low",
            Self::NonTerminatingPaths => "Paths never reach the ending",
            Self::NoScenes => "Quest has no scenes",
            Self::MissingParam => "Missing generation parameter",
            Self::SceneCountOutOfRange => "Scene count out of range",
            Self::MaxDepthOutOfRange => "Max depth out of range",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::Malformed => Some("Provide an object with a `scenes` array of scene records."),
            Self::TooFewScenes => Some("Generate more scenes before validating."),
            Self::DuplicateId => Some("Give every scene a unique `scene_id`."),
            Self::MissingTerminal => Some("Add a scene with id `quest_end`."),
            Self::TextTooShort => Some("Expand the scene description."),
            Self::BadChoiceCount => {
                Some("Give each scene 2-3 choices; `quest_end` needs at least one.")
            }
            Self::IncompleteChoice => Some("Every choice needs non-empty `text` and `next_scene`."),
            Self::TerminalMustSelfLoop => {
                Some("Point every `quest_end` choice at `quest_end` itself.")
            }
            Self::DanglingTarget => Some("Point the choice at an existing `scene_id`."),
            Self::UnknownEntry => None,
            Self::DepthTooLow => Some("Add a longer branch of at least three scenes."),
            Self::NonTerminatingPaths => {
                Some("Remove the listed loops and dead ends so every path reaches `quest_end`.")
            }
            Self::NoScenes => Some("Provide at least one scene; the first one is the entry."),
            Self::MissingParam => Some("Give genre, hero and goal non-empty values."),
            Self::SceneCountOutOfRange => Some("Choose a scene count between 5 and 10."),
            Self::MaxDepthOutOfRange => {
                Some("Choose a max depth of at least 1 and no more than the scene count.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::Malformed,
            ErrorCode::TooFewScenes,
            ErrorCode::DuplicateId,
            ErrorCode::MissingTerminal,
            ErrorCode::TextTooShort,
            ErrorCode::BadChoiceCount,
            ErrorCode::IncompleteChoice,
            ErrorCode::TerminalMustSelfLoop,
            ErrorCode::DanglingTarget,
            ErrorCode::UnknownEntry,
            ErrorCode::DepthTooLow,
            ErrorCode::NonTerminatingPaths,
            ErrorCode::NoScenes,
            ErrorCode::MissingParam,
            ErrorCode::SceneCountOutOfRange,
            ErrorCode::MaxDepthOutOfRange,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
            assert!(!code.message().is_empty());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::DanglingTarget.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('Q'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn bad_choice_count_names_the_bound() {
        let low = StructuralError::BadChoiceCount {
            id: "cave".into(),
            count: 1,
            bound: ChoiceBound::Min(2),
        };
        let high = StructuralError::BadChoiceCount {
            id: "cave".into(),
            count: 4,
            bound: ChoiceBound::Max(3),
        };
        assert_eq!(low.to_string(), "scene 'cave' has 1 choices, at least 2 required");
        assert_eq!(high.to_string(), "scene 'cave' has 4 choices, at most 3 allowed");
    }

    #[test]
    fn non_terminating_message_lists_every_path() {
        let err = GraphError::NonTerminatingPaths {
            paths: vec!["a -> b -> a".into(), "a -> c".into()],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 path(s)"), "msg: {msg}");
        assert!(msg.contains("a -> b -> a; a -> c"), "msg: {msg}");
    }

    #[test]
    fn empty_quest_has_its_own_code() {
        let err: ValidationError = GraphError::NoScenes.into();
        assert_eq!(err.code().code(), "Q3004");
        assert!(!err.to_string().contains("''"));
    }

    #[test]
    fn validation_error_is_transparent() {
        let err: ValidationError = StructuralError::MissingTerminal.into();
        assert_eq!(err.to_string(), "quest has no terminal scene 'quest_end'");
        assert_eq!(err.code(), ErrorCode::MissingTerminal);
        assert!(err.suggestion().contains("quest_end"));
    }
}
