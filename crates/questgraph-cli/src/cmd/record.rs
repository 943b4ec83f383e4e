//! `qg record`: validate a quest and save it with its provenance.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Args, ValueEnum};
use questgraph_core::record::{
    Complexity, DEFAULT_MODEL, EndingType, GenerationParams, ParamsError, QuestRecord,
};
use serde::Serialize;
use tracing::info;

use super::validate::{check_candidate, reject};
use super::{Settings, read_input};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Quest JSON file, or `-` to read stdin.
    pub input: PathBuf,

    #[arg(long)]
    pub genre: String,

    #[arg(long)]
    pub hero: String,

    #[arg(long)]
    pub goal: String,

    /// Number of scenes the quest was asked for (5-10).
    #[arg(long, default_value_t = 10)]
    pub scene_count: usize,

    /// Longest branch the quest was asked for, at most the scene count.
    #[arg(long, default_value_t = 5)]
    pub max_depth: usize,

    #[arg(long, value_enum, default_value_t = ComplexityArg::Medium)]
    pub complexity: ComplexityArg,

    #[arg(long, value_enum, default_value_t = EndingArg::Single)]
    pub ending_type: EndingArg,

    /// Model that generated the quest.
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Directory the record is written to.
    #[arg(long, default_value = "quests")]
    pub out_dir: PathBuf,

    /// Treat the input as raw model output and extract the JSON object from it.
    #[arg(long)]
    pub raw: bool,

    /// Add a self-loop choice to a bare `quest_end` before validating.
    #[arg(long)]
    pub repair: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComplexityArg {
    Simple,
    Medium,
    Complex,
}

impl From<ComplexityArg> for Complexity {
    fn from(arg: ComplexityArg) -> Self {
        match arg {
            ComplexityArg::Simple => Self::Simple,
            ComplexityArg::Medium => Self::Medium,
            ComplexityArg::Complex => Self::Complex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EndingArg {
    Single,
    Multiple,
}

impl From<EndingArg> for EndingType {
    fn from(arg: EndingArg) -> Self {
        match arg {
            EndingArg::Single => Self::Single,
            EndingArg::Multiple => Self::Multiple,
        }
    }
}

impl RecordArgs {
    fn params(&self) -> GenerationParams {
        GenerationParams {
            scene_count: self.scene_count,
            max_depth: self.max_depth,
            complexity: self.complexity.into(),
            ending_type: self.ending_type.into(),
            ..GenerationParams::new(&self.genre, &self.hero, &self.goal)
        }
    }
}

#[derive(Debug, Serialize)]
struct Saved {
    ok: bool,
    path: PathBuf,
    fingerprint: String,
}

pub fn run_record(args: &RecordArgs, settings: &Settings, output: OutputMode) -> Result<()> {
    let params = args.params();
    if let Err(e) = params.check() {
        render_error(output, &params_error(&e))?;
        anyhow::bail!("{e}");
    }

    let text = read_input(&args.input)?;
    let outcome = match check_candidate(&text, args.raw, args.repair, &settings.config) {
        Ok(outcome) => outcome,
        Err(err) => return reject(&err, output),
    };

    let record = QuestRecord::new(&params, outcome.accepted.graph, &args.model, Utc::now());
    let path = record.write_to(&args.out_dir)?;
    info!(genre = %params.genre, hero = %params.hero, "quest recorded");

    let saved = Saved {
        ok: true,
        path,
        fingerprint: record.metadata.fingerprint,
    };
    render_mode(output, &saved, render_text, render_pretty)
}

fn params_error(err: &ParamsError) -> CliError {
    CliError::with_details(err.to_string(), err.suggestion(), err.code().to_string())
}

fn render_text(s: &Saved, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", s.path.display())
}

fn render_pretty(s: &Saved, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Quest recorded")?;
    pretty_kv(w, "Path", s.path.display().to_string())?;
    pretty_kv(w, "Fingerprint", &s.fingerprint)
}
