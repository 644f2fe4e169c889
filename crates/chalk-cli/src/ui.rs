//! Terminal capabilities, probed once at startup.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};

/// What the process is attached to.
#[derive(Clone, Copy, Debug, Default)]
pub struct Terminal {
    pub stdout_tty: bool,
    pub stderr_tty: bool,
    pub no_color: bool,
    pub columns: Option<usize>,
}

impl Terminal {
    fn probe() -> Self {
        Self {
            stdout_tty: std::io::stdout().is_terminal(),
            stderr_tty: std::io::stderr().is_terminal(),
            no_color: std::env::var_os("NO_COLOR").is_some(),
            columns: std::env::var("COLUMNS")
                .ok()
                .and_then(|value| value.parse::<usize>().ok()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UiPrefs {
    /// Color sentiment cells in tables.
    pub sentiment_color: bool,
    /// Show the submission spinner on stderr.
    pub progress: bool,
    /// Table width budget. Narrow terminals get no budget.
    pub term_width: Option<usize>,
}

impl UiPrefs {
    #[must_use]
    pub fn resolve(flags: &GlobalFlags, term: Terminal) -> Self {
        let sentiment_color = match flags.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => term.stdout_tty && !term.no_color && !flags.quiet,
        };

        let progress = match flags.progress {
            ProgressMode::On => !flags.quiet,
            ProgressMode::Off => false,
            ProgressMode::Auto => {
                term.stderr_tty && !flags.quiet && flags.format == OutputFormat::Text
            }
        };

        Self {
            sentiment_color,
            progress,
            term_width: term.columns.filter(|width| *width >= 40),
        }
    }
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(UiPrefs::resolve(flags, Terminal::probe()));
}

/// Prefs from [`init`], or everything off before it runs.
#[must_use]
pub fn prefs() -> UiPrefs {
    UI_PREFS.get().copied().unwrap_or_default()
}
