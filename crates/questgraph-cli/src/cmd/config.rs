use std::io::{self, Write};

use anyhow::Result;
use questgraph_core::config::{ConfigSource, ValidatorConfig};
use serde::Serialize;

use super::Settings;
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

#[derive(Debug, Serialize)]
struct EffectiveConfig<'a> {
    source: &'a ConfigSource,
    config: &'a ValidatorConfig,
}

/// Print the effective validator configuration and where it came from.
pub fn run_config(settings: &Settings, output: OutputMode) -> Result<()> {
    let effective = EffectiveConfig {
        source: &settings.source,
        config: &settings.config,
    };
    render_mode(output, &effective, render_text, render_pretty)
}

fn describe(source: &ConfigSource) -> String {
    match source {
        ConfigSource::Explicit(path) => format!("{} (--config)", path.display()),
        ConfigSource::Project(path) => format!("{} (project)", path.display()),
        ConfigSource::User(path) => format!("{} (user)", path.display()),
        ConfigSource::Defaults => "built-in defaults".to_string(),
    }
}

fn render_text(e: &EffectiveConfig<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "# source: {}", describe(e.source))?;
    let body = toml::to_string(e.config).map_err(io::Error::other)?;
    write!(w, "{body}")
}

fn render_pretty(e: &EffectiveConfig<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Validator configuration")?;
    pretty_kv(w, "Source", describe(e.source))?;
    let c = e.config;
    pretty_kv(w, "Min scenes", c.min_scenes.to_string())?;
    pretty_kv(w, "Min text chars", c.min_text_chars.to_string())?;
    pretty_kv(w, "Choices per scene", format!("{}-{}", c.min_choices, c.max_choices))?;
    pretty_kv(w, "Ending min choices", c.terminal_min_choices.to_string())?;
    pretty_kv(w, "Min branch depth", c.min_branch_depth.to_string())
}
