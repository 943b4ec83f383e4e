pub mod config;
pub mod record;
pub mod validate;

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use questgraph_core::config::{ConfigSource, ValidatorConfig};

/// Effective validator configuration shared by every command.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: ValidatorConfig,
    pub source: ConfigSource,
}

/// Read a quest document from `path`, or from stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read quest from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
