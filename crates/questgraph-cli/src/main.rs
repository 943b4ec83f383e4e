#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use questgraph_core::config::resolve_config;
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "qg: structural validator for generated quest graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (pretty, text, json).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Validator config file; overrides project and user config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Validate a quest",
        long_about = "Decode a quest graph, optionally repair it, and check every structural and reachability rule.",
        after_help = "EXAMPLES:\n    # Validate a quest file\n    qg validate quest.json\n\n    # Validate raw model output from stdin, fixing a bare ending\n    generate | qg validate - --raw --repair\n\n    # Emit machine-readable output\n    qg validate quest.json --json"
    )]
    Validate(cmd::validate::ValidateArgs),

    #[command(
        about = "Validate and save a quest record",
        long_about = "Validate a quest and write it to a record file with its generation parameters (genre, hero, goal, scene count, max depth, complexity, ending type), timestamp and model.",
        after_help = "EXAMPLES:\n    # Save an accepted quest under ./quests\n    qg record quest.json --genre fantasy --hero knight --goal \"find the grail\"\n\n    # Record the generation parameters too\n    qg record quest.json --genre noir --hero detective --goal \"solve it\" --scene-count 6 --complexity complex"
    )]
    Record(cmd::record::RecordArgs),

    #[command(
        about = "Show the effective validator configuration",
        after_help = "EXAMPLES:\n    # Show thresholds and where they came from\n    qg config\n\n    # Use a specific file\n    qg --config strict.toml config"
    )]
    Config,
}

/// Install the stderr subscriber.
///
/// `QUESTGRAPH_LOG` takes a full `EnvFilter` directive; without it, `DEBUG`
/// or `--verbose` switch the default from info to debug.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("QUESTGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "questgraph=debug,qg=debug,info"
        } else {
            "questgraph=info,qg=info,warn"
        })
    });

    let format = env::var("QUESTGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;
    let output = cli.output_mode();

    let (config, source) = resolve_config(cli.config.as_deref(), &project_root)?;
    debug!(?source, "resolved validator config");
    let settings = cmd::Settings { config, source };

    match cli.command {
        Commands::Validate(ref args) => cmd::validate::run_validate(args, &settings, output),
        Commands::Record(ref args) => cmd::record::run_record(args, &settings, output),
        Commands::Config => cmd::config::run_config(&settings, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["qg", "validate", "quest.json", "--json"]);
        assert!(cli.json);
        assert_eq!(cli.output_mode(), OutputMode::Json);
    }

    #[test]
    fn format_flag_parses() {
        let cli = Cli::parse_from(["qg", "--format", "text", "config"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert!(matches!(cli.command, Commands::Config));
    }

    #[test]
    fn validate_flags_parse() {
        let cli = Cli::parse_from(["qg", "validate", "-", "--raw", "--repair"]);
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.input, PathBuf::from("-"));
                assert!(args.raw);
                assert!(args.repair);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn record_requires_provenance() {
        assert!(Cli::try_parse_from(["qg", "record", "quest.json", "--genre", "noir"]).is_err());

        let cli = Cli::parse_from([
            "qg", "record", "quest.json", "--genre", "noir", "--hero", "detective", "--goal",
            "solve it",
        ]);
        match cli.command {
            Commands::Record(args) => {
                assert_eq!(args.model, "mistral-large-latest");
                assert_eq!(args.out_dir, PathBuf::from("quests"));
                assert_eq!(args.scene_count, 10);
                assert_eq!(args.max_depth, 5);
                assert_eq!(args.complexity, cmd::record::ComplexityArg::Medium);
                assert_eq!(args.ending_type, cmd::record::EndingArg::Single);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn record_generation_flags_parse() {
        let cli = Cli::parse_from([
            "qg", "record", "q.json", "--genre", "noir", "--hero", "detective", "--goal", "solve",
            "--scene-count", "6", "--max-depth", "4", "--complexity", "simple", "--ending-type",
            "multiple",
        ]);
        match cli.command {
            Commands::Record(args) => {
                assert_eq!(args.scene_count, 6);
                assert_eq!(args.max_depth, 4);
                assert_eq!(args.complexity, cmd::record::ComplexityArg::Simple);
                assert_eq!(args.ending_type, cmd::record::EndingArg::Multiple);
            }
            other => panic!("unexpected {other:?}"),
        }

        assert!(
            Cli::try_parse_from([
                "qg", "record", "q.json", "--genre", "noir", "--hero", "d", "--goal", "g",
                "--complexity", "epic",
            ])
            .is_err()
        );
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["qg", "validate", "q.json", "--config", "strict.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("strict.toml")));
    }
}
