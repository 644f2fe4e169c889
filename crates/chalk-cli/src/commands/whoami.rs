use chalk_auth::IdentityProvider as _;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct WhoamiResponse {
    state: &'static str,
    user_id: Option<String>,
    authenticated: bool,
    uid_source: Option<String>,
    store: String,
    app_id: String,
}

/// Handle `chalk whoami`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = ctx.auth.current_identity();
    let identity = state.identity();
    let authenticated = identity.is_some_and(|identity| identity.authenticated);

    let response = WhoamiResponse {
        state: state.as_str(),
        user_id: identity.map(|identity| identity.user_id.clone()),
        authenticated,
        uid_source: if identity.is_some() && !authenticated {
            chalk_auth::anonymous::detect_uid_source()
        } else {
            None
        },
        store: ctx.config.store.path.clone(),
        app_id: ctx.journal.app_id().to_string(),
    };

    output(&response, flags.format)
}
