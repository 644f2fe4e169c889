use chalk_db::JournalStore as _;
use futures::StreamExt as _;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::cli::root_commands::ListArgs;
use crate::commands::shared::feed::print_feed;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;

/// Handle `chalk watch`: reprint the feed on every store change until Ctrl-C.
pub async fn handle(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let identity = ctx.require_identity()?;
    let limit = effective_limit(args.max, flags.limit, ctx.config.general.default_limit);

    let mut feed = ctx.journal.subscribe_all(&identity.user_id);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut printed = false;
    loop {
        tokio::select! {
            snapshot = feed.next() => match snapshot {
                Some(Ok(entries)) => {
                    if printed && flags.format == OutputFormat::Text {
                        println!("\n----------------------------------------\n");
                    }
                    print_feed(&entries, limit, flags.format)?;
                    printed = true;
                }
                Some(Err(error)) => {
                    tracing::error!(%error, "journal subscription failed");
                    eprintln!("Error loading entries.");
                }
                None => return Ok(()),
            },
            _ = &mut ctrl_c => return Ok(()),
        }
    }
}
