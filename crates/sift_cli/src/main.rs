//! # Commands
//!
//! - `sift scan` - Scan a corpus of source files against the loaded rules
//! - `sift rules` - List loaded detection rules
//! - `sift init` - Create a configuration file and starter rule

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod commands;
mod output;
mod ui;

use std::path::PathBuf;

use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use console::style;
pub use sift_core::CONFIG_FILENAME;

use crate::ui::colors;

const REPO_URL: &str = "https://github.com/spikermint/sift";

#[derive(Debug, Parser)]
#[command(
    name = "sift",
    version,
    styles = ui::clap_styles(),
    arg_required_else_help = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(visible_alias = "s")]
    Scan(ScanArgs),

    #[command(visible_alias = "r")]
    Rules(RulesArgs),

    Init(InitArgs),
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// Machine-readable JSON Lines, one detection per line.
    Json,
}

/// Arguments for the `sift scan` command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Corpus root to scan.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Directory of rule definition files (overrides configuration).
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to `.sift.toml` configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Glob patterns to exclude from scanning.
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Skip `.gitignore` rules when collecting files.
    #[arg(long)]
    pub skip_gitignore: bool,

    /// Skip files larger than this size in bytes.
    #[arg(long)]
    pub max_file_size: Option<u64>,

    /// Number of parallel scanning threads.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Exit with a non-zero status when detections are found.
    #[arg(long)]
    pub fail_on_detect: bool,

    /// Increase output verbosity (repeat for more detail).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Arguments for the `sift rules` command.
#[derive(Debug, Parser)]
pub struct RulesArgs {
    /// Directory of rule definition files (overrides configuration).
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Path to `.sift.toml` configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Filter rules by language tag.
    #[arg(short, long)]
    pub language: Option<String>,

    /// Show rule details including pattern and example.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the `sift init` command.
#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,

    /// Write the config file to a custom path.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn main() {
    #[cfg(feature = "tracing")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(false).without_time())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let cli = parse_cli();

    if let Err(e) = run(cli.command) {
        ui::print_error(&format!("{e:#}"));
        std::process::exit(ui::exit::ERROR);
    }
}

fn parse_cli() -> Cli {
    let cmd = Cli::command().about(build_about()).after_help(build_after_help());

    let matches = cmd.get_matches();

    #[expect(clippy::expect_used, reason = "clap already validated args; this cannot fail")]
    Cli::from_arg_matches(&matches).expect("failed to parse arguments")
}

fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Scan(args) => commands::scan::run(&args),
        Command::Rules(args) => commands::rules::run(&args),
        Command::Init(args) => commands::init::run(args.force, args.output),
    }
}

fn build_about() -> String {
    format!(
        r"
  {} is a rule-driven secret scanner for source code.

  Declarative rules pair a language and library context with a pattern;
  sift reports every place in your corpus where a rule matches.",
        colors::accent().apply_to("sift").bold()
    )
}

fn build_after_help() -> String {
    format!(
        r"
  {}
    sift scan                      Scan the working directory
    sift scan src/                 Scan a specific corpus root
    sift scan . --format json      One JSON object per detection
    sift scan . --fail-on-detect   CI gating: non-zero exit on detections
    sift rules --verbose           Show loaded rules with patterns
    sift init                      Create config and a starter rule

  Learn more: {}",
        style("Examples:").bold(),
        colors::accent().apply_to(REPO_URL).underlined()
    )
}
