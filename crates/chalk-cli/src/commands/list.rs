use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ListArgs;
use crate::commands::shared::feed::print_feed;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;

/// Handle `chalk list`.
pub async fn handle(args: &ListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let identity = ctx.require_identity()?;
    let entries = ctx
        .journal
        .list_entries(&identity.user_id)
        .await
        .context("Error loading entries.")?;

    let limit = effective_limit(args.max, flags.limit, ctx.config.general.default_limit);
    print_feed(&entries, limit, flags.format)
}
