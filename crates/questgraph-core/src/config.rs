//! Validator thresholds and their TOML loading.
//!
//! Resolution order for [`resolve_config`]:
//!
//! 1. an explicit path (e.g. `qg --config path.toml`),
//! 2. `.questgraph/config.toml` under the project root,
//! 3. `questgraph/config.toml` in the user config dir,
//! 4. built-in defaults.
//!
//! Missing keys fall back to their defaults, so a file only needs to name the
//! thresholds it changes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tunable bounds applied by the structural checker and reachability analyzer.
///
/// The terminal id is not here: `quest_end` is fixed by
/// [`crate::model::TERMINAL_ID`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default = "default_min_scenes")]
    pub min_scenes: usize,
    /// Minimum scene text length, in characters.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,
    #[serde(default = "default_min_choices")]
    pub min_choices: usize,
    #[serde(default = "default_max_choices")]
    pub max_choices: usize,
    #[serde(default = "default_terminal_min_choices")]
    pub terminal_min_choices: usize,
    #[serde(default = "default_min_branch_depth")]
    pub min_branch_depth: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_scenes: default_min_scenes(),
            min_text_chars: default_min_text_chars(),
            min_choices: default_min_choices(),
            max_choices: default_max_choices(),
            terminal_min_choices: default_terminal_min_choices(),
            min_branch_depth: default_min_branch_depth(),
        }
    }
}

const fn default_min_scenes() -> usize {
    5
}

const fn default_min_text_chars() -> usize {
    50
}

const fn default_min_choices() -> usize {
    2
}

const fn default_max_choices() -> usize {
    3
}

const fn default_terminal_min_choices() -> usize {
    1
}

const fn default_min_branch_depth() -> usize {
    3
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    Explicit(PathBuf),
    Project(PathBuf),
    User(PathBuf),
    Defaults,
}

/// Parse a config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for
/// [`ValidatorConfig`].
pub fn load_config_file(path: &Path) -> Result<ValidatorConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ValidatorConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the effective configuration.
///
/// An explicit path must exist; the project and user locations are optional.
///
/// # Errors
///
/// Returns an error if a selected file cannot be read or parsed.
pub fn resolve_config(
    explicit: Option<&Path>,
    project_root: &Path,
) -> Result<(ValidatorConfig, ConfigSource)> {
    let user_path = dirs::config_dir().map(|dir| dir.join("questgraph/config.toml"));
    resolve_config_inner(explicit, project_root, user_path.as_deref())
}

fn resolve_config_inner(
    explicit: Option<&Path>,
    project_root: &Path,
    user_path: Option<&Path>,
) -> Result<(ValidatorConfig, ConfigSource)> {
    if let Some(path) = explicit {
        let config = load_config_file(path)?;
        return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
    }

    let project_path = project_root.join(".questgraph/config.toml");
    if project_path.exists() {
        let config = load_config_file(&project_path)?;
        return Ok((config, ConfigSource::Project(project_path)));
    }

    if let Some(path) = user_path.filter(|p| p.exists()) {
        let config = load_config_file(path)?;
        return Ok((config, ConfigSource::User(path.to_path_buf())));
    }

    debug!("no config file found, using defaults");
    Ok((ValidatorConfig::default(), ConfigSource::Defaults))
}
