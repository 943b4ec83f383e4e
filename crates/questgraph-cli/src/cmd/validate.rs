//! `qg validate`: decode a quest, optionally repair it, and print the verdict.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use questgraph_core::config::ValidatorConfig;
use questgraph_core::extract::{extract_candidate, parse_candidate};
use questgraph_core::graph::DepthReport;
use questgraph_core::graph::reach::PATH_SEPARATOR;
use questgraph_core::repair::{RepairAction, RepairReport, repair_candidate};
use questgraph_core::{Accepted, ValidationError, Validator};
use serde::Serialize;
use tracing::debug;

use super::{Settings, read_input};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Quest JSON file, or `-` to read stdin.
    pub input: PathBuf,

    /// Treat the input as raw model output and extract the JSON object from it.
    #[arg(long)]
    pub raw: bool,

    /// Add a self-loop choice to a bare `quest_end` before validating.
    #[arg(long)]
    pub repair: bool,
}

/// An accepted candidate and the fixes applied on the way.
#[derive(Debug)]
pub struct Outcome {
    pub accepted: Accepted,
    pub repairs: RepairReport,
}

/// Decode `text`, repair it if asked, and validate.
pub fn check_candidate(
    text: &str,
    raw: bool,
    repair: bool,
    config: &ValidatorConfig,
) -> Result<Outcome, ValidationError> {
    let mut candidate = if raw {
        extract_candidate(text)?
    } else {
        parse_candidate(text)?
    };

    let repairs = if repair {
        repair_candidate(&mut candidate)
    } else {
        RepairReport::default()
    };
    debug!(repairs = repairs.actions.len(), "candidate decoded");

    let accepted = Validator::new(config.clone()).validate_with_report(&candidate)?;
    Ok(Outcome { accepted, repairs })
}

/// Render a rejection and turn it into a failing exit status.
pub fn reject(err: &ValidationError, output: OutputMode) -> Result<()> {
    render_error(output, &CliError::from(err))?;
    anyhow::bail!("quest rejected ({})", err.code())
}

#[derive(Debug, Serialize)]
struct Verdict<'a> {
    ok: bool,
    #[serde(flatten)]
    report: &'a DepthReport,
    fingerprint: String,
    repairs: &'a [RepairAction],
}

pub fn run_validate(args: &ValidateArgs, settings: &Settings, output: OutputMode) -> Result<()> {
    let text = read_input(&args.input)?;

    let outcome = match check_candidate(&text, args.raw, args.repair, &settings.config) {
        Ok(outcome) => outcome,
        Err(err) => return reject(&err, output),
    };

    let verdict = Verdict {
        ok: true,
        report: &outcome.accepted.report,
        fingerprint: outcome.accepted.graph.content_hash(),
        repairs: &outcome.repairs.actions,
    };
    render_mode(output, &verdict, render_text, render_pretty)
}

fn render_text(v: &Verdict<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(
        w,
        "accepted scenes={} depth={} entry={} fingerprint={}",
        v.report.scene_count, v.report.max_branch_depth, v.report.entry, v.fingerprint
    )?;
    writeln!(w, "deepest={}", v.report.deepest_path.join(PATH_SEPARATOR))?;
    if !v.report.unreachable.is_empty() {
        writeln!(w, "unreachable={}", v.report.unreachable.join(","))?;
    }
    for action in v.repairs {
        writeln!(w, "repaired={}", action.as_str())?;
    }
    Ok(())
}

fn render_pretty(v: &Verdict<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Quest accepted")?;
    pretty_kv(w, "Entry", &v.report.entry)?;
    pretty_kv(w, "Scenes", v.report.scene_count.to_string())?;
    pretty_kv(w, "Branch depth", v.report.max_branch_depth.to_string())?;
    pretty_kv(w, "Deepest path", v.report.deepest_path.join(PATH_SEPARATOR))?;
    if !v.report.unreachable.is_empty() {
        pretty_kv(w, "Unreachable", v.report.unreachable.join(", "))?;
    }
    pretty_kv(w, "Fingerprint", &v.fingerprint)?;
    if !v.repairs.is_empty() {
        let names: Vec<&str> = v.repairs.iter().map(RepairAction::as_str).collect();
        pretty_kv(w, "Repairs", names.join(", "))?;
    }
    Ok(())
}
