use chalk_core::entities::JournalEntry;
use chalk_journal::feed::{render_feed, sort_newest_first, views};

use crate::cli::OutputFormat;
use crate::output::output;

/// Print the newest `limit` entries.
pub fn print_feed(entries: &[JournalEntry], limit: usize, format: OutputFormat) -> anyhow::Result<()> {
    let mut newest = entries.to_vec();
    sort_newest_first(&mut newest);
    newest.truncate(limit);

    match format {
        OutputFormat::Text => {
            println!("{}", render_feed(&newest));
            Ok(())
        }
        _ => output(&views(&newest), format),
    }
}
