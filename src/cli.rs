use clap::{Parser, Subcommand, ValueEnum};
use quality_report::ViewMode;
use std::path::PathBuf;

const TAGLINE: &str = "Submit source files for quality analysis and browse the report";

#[derive(Parser, Debug)]
#[command(name = "quality-report")]
#[command(version)]
#[command(about = TAGLINE, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Analysis service base URL (default: http://localhost:5033/api)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to quality-report.toml (default: ./quality-report.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Display language for labels: en|tr
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Output JSON instead of human readable
    #[arg(long, global = true)]
    pub json: bool,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a file and wait for its report
    Submit {
        /// Source file to analyse
        file: PathBuf,

        /// Source language of the file
        #[arg(short, long, default_value = "python")]
        language: String,

        /// Use the offline simulated backend instead of the service
        #[arg(long)]
        simulate: bool,

        #[command(flatten)]
        poll: PollArgs,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Poll for the report of an existing submission
    Report {
        /// Submission id returned by a previous upload
        submission_id: String,

        #[command(flatten)]
        poll: PollArgs,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// List finished reports
    List,

    /// Show the languages the service accepts
    Languages,
}

#[derive(clap::Args, Debug, Clone)]
pub struct PollArgs {
    /// Maximum report fetch attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Delay between attempts in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ViewArgs {
    /// How to present issues
    #[arg(long, value_enum, default_value_t = ModeArg::All)]
    pub mode: ModeArg,

    /// Browse the report interactively
    #[arg(short, long)]
    pub interactive: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    All,
    Sequential,
}

impl From<ModeArg> for ViewMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::All => ViewMode::All,
            ModeArg::Sequential => ViewMode::Sequential,
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
