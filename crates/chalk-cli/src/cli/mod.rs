use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};
pub use root_commands::Commands;

/// Top-level CLI parser for the `chalk` binary.
#[derive(Debug, Parser)]
#[command(
    name = "chalk",
    version,
    about = "chalk - a journal that reads the mood of what you write"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: text, json, table, raw
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Max entries to show
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Color for table output
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Spinner while an entry is analyzed and saved
    #[arg(long, global = true, default_value = "auto")]
    pub progress: ProgressMode,

    /// Directory holding the `.env` file to load (defaults to the current one)
    #[arg(long, global = true)]
    pub env_dir: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            color: self.color,
            progress: self.progress,
            env_dir: self.env_dir.clone(),
        }
    }
}
