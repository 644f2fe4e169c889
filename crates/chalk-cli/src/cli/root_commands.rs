use clap::{Args, Subcommand};

use crate::cli::subcommands::AuthCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Analyze and save a journal entry.
    Write(WriteArgs),
    /// Show saved entries, newest first.
    List(ListArgs),
    /// Follow the entry feed; reprints on every change.
    Watch(ListArgs),
    /// Show who entries are saved for.
    Whoami,
    /// Sign-in management.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct WriteArgs {
    /// Entry text. Read from stdin when omitted.
    pub text: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct ListArgs {
    /// Max entries to show (overrides --limit).
    #[arg(long = "max")]
    pub max: Option<u32>,
}
