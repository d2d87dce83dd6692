// Mon Feb 02 2026 - Alex

use crate::report::LeakKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub const STDIN_MARKER: &str = "-";

#[derive(Parser, Debug)]
#[command(name = "leak-report")]
#[command(author = "Alex")]
#[command(version = "0.1.0")]
#[command(about = "Structured reports from macOS leaks output", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Overrides the config file's log level.
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// JSON config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse saved `leaks` output files (`-` reads stdin).
    Parse(ParseArgs),
    /// Run `leaks` against a process and parse the result.
    Run(RunArgs),
    /// Render a saved JSON report as HTML.
    Render(RenderArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindFilter {
    Leaks,
    Cycles,
}

impl KindFilter {
    pub fn kind(self) -> LeakKind {
        match self {
            KindFilter::Leaks => LeakKind::Leak,
            KindFilter::Cycles => LeakKind::Cycle,
        }
    }
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Attached to every record.
    #[arg(long)]
    pub test_name: Option<String>,

    #[arg(long, value_enum)]
    pub only: Option<KindFilter>,

    /// Single-line JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,

    /// Write the JSON report here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for per-record dumps and the aggregate report.
    #[arg(long)]
    pub artifacts: Option<PathBuf>,

    #[arg(long)]
    pub html: Option<PathBuf>,

    /// Exit with status 2 when any leak or cycle is reported.
    #[arg(long)]
    pub fail_on_leaks: bool,
}

#[derive(Parser, Debug)]
pub struct ParseArgs {
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Target recorded in the report. Defaults to the input file stem.
    #[arg(short, long)]
    pub target: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Process id or name.
    #[arg(short, long)]
    pub target: String,

    /// Simulator device identifier.
    #[arg(short, long)]
    pub device: Option<String>,

    #[arg(short, long)]
    pub exclude: Vec<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    #[arg(short, long)]
    pub report: PathBuf,

    #[arg(short, long)]
    pub output: PathBuf,

    /// Append the raw tool output.
    #[arg(long)]
    pub raw: bool,

    /// Page heading. Defaults to "Memory Leak Report".
    #[arg(long)]
    pub title: Option<String>,
}

impl ParseArgs {
    pub fn validate(&self) -> Result<(), String> {
        let stdin_count = self.inputs.iter().filter(|p| p.as_os_str() == STDIN_MARKER).count();
        if stdin_count > 1 {
            return Err("stdin (-) can only be given once".to_string());
        }
        if self.inputs.len() > 1 && (self.output.output.is_some() || self.output.html.is_some()) {
            return Err("--output and --html need a single input".to_string());
        }
        for input in &self.inputs {
            if input.as_os_str() != STDIN_MARKER && !input.exists() {
                return Err(format!("Input file does not exist: {:?}", input));
            }
        }
        Ok(())
    }
}

impl RunArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.target.trim().is_empty() {
            return Err("--target must not be empty".to_string());
        }
        if self.exclude.iter().any(|s| s.trim().is_empty()) {
            return Err("--exclude needs a symbol name".to_string());
        }
        Ok(())
    }
}

impl RenderArgs {
    pub fn validate(&self) -> Result<(), String> {
        if !self.report.exists() {
            return Err(format!("Report file does not exist: {:?}", self.report));
        }
        Ok(())
    }
}
