use anyhow::Context;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Serialize)]
struct ResetResponse {
    reset: bool,
    note: &'static str,
}

pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    chalk_auth::reset_anonymous().context("failed to forget the anonymous user id")?;
    tracing::info!("anonymous uid removed");

    output(
        &ResetResponse {
            reset: true,
            note: "the next run signs in as a new anonymous user; earlier entries stay with the old id",
        },
        flags.format,
    )
}
