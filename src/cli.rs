//! CLI argument parsing for Codex

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for check results
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "codex")]
#[command(version)]
#[command(about = "Seven-color canon validator with Gray event reporting", long_about = None)]
pub struct Cli {
    /// Enable debug tracing output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a token sequence against the adjacency law
    Check(CheckArgs),
    /// Run compression-based degeneracy analysis (JSON output)
    Degeneracy(DegeneracyArgs),
    /// Record each transition of a sequence into an execution trace
    Trace(TraceArgs),
    /// Summarize a previously saved trace file
    Inspect(InspectArgs),
}

/// Where token content comes from
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// File of tokens: JSON array, color glyphs, or one name per line
    #[arg(value_name = "FILE", required_unless_present = "stdin")]
    pub file: Option<PathBuf>,

    /// Read tokens from stdin instead of a file
    #[arg(long, conflicts_with = "file")]
    pub stdin: bool,
}

/// Degeneracy analyzer knobs shared by `check` and `degeneracy`
#[derive(Args, Debug, Clone)]
pub struct AnalyzerArgs {
    /// Window size for NCD analysis (overrides the config file)
    #[arg(long = "window-size", value_name = "N")]
    pub window_size: Option<usize>,

    /// TOML file with degeneracy thresholds
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Show the full sequence and parse errors
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Also run degeneracy analysis; a degenerate sequence fails the check
    #[arg(long)]
    pub degeneracy: bool,

    #[command(flatten)]
    pub analyzer: AnalyzerArgs,
}

#[derive(Args, Debug)]
pub struct DegeneracyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub analyzer: AnalyzerArgs,
}

#[derive(Args, Debug)]
pub struct TraceArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Trace identifier (default: trace-YYYYmmdd-HHMMSS)
    #[arg(long = "trace-id", value_name = "ID")]
    pub trace_id: Option<String>,

    /// Save the trace document here instead of printing it
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Trace document written by `codex trace`
    #[arg(value_name = "TRACE_FILE")]
    pub trace_file: PathBuf,
}
