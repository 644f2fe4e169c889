use std::path::Path;

use anyhow::Context;
use chalk_analyzer::GeminiClient;
use chalk_auth::{IdentityProvider, SessionAuth};
use chalk_config::ChalkConfig;
use chalk_core::identity::SessionIdentity;
use chalk_db::JournalService;
use chalk_journal::{AnalysisOrchestrator, OrchestratorSettings};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: ChalkConfig,
    pub auth: SessionAuth,
    pub journal: JournalService,
}

/// The orchestrator as the CLI wires it: Gemini, borrowing the context's
/// store and sign-in state.
pub type Orchestrator<'a> = AnalysisOrchestrator<GeminiClient, &'a JournalService, &'a SessionAuth>;

impl AppContext {
    /// Open the store and sign in.
    ///
    /// A failed sign-in is logged and leaves the session signed out; commands
    /// that need an identity report it.
    pub async fn init(config: ChalkConfig) -> anyhow::Result<Self> {
        let journal = open_journal(&config).await?;

        let auth = SessionAuth::new();
        if let Err(error) = auth.sign_in(&config.auth) {
            tracing::warn!(%error, "sign-in failed; entries cannot be saved or listed");
        }

        Ok(Self {
            config,
            auth,
            journal,
        })
    }

    /// The signed-in identity, or an error explaining why there is none.
    pub fn require_identity(&self) -> anyhow::Result<SessionIdentity> {
        self.auth
            .current_identity()
            .identity()
            .cloned()
            .ok_or(chalk_auth::AuthError::NotAuthenticated)
            .context("no signed-in user")
    }

    /// Build the write pipeline. Needs an analyzer API key.
    pub fn orchestrator(&self) -> anyhow::Result<Orchestrator<'_>> {
        let analyzer = GeminiClient::new(&self.config.analyzer)
            .context("failed to initialize the Gemini client")?;
        let settings = OrchestratorSettings::from_config(&self.config)
            .context("invalid retry configuration")?;
        Ok(AnalysisOrchestrator::new(
            analyzer,
            &self.journal,
            &self.auth,
            settings,
        ))
    }
}

async fn open_journal(config: &ChalkConfig) -> anyhow::Result<JournalService> {
    let path = &config.store.path;
    if !config.store.is_in_memory()
        && let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let journal = JournalService::new_local(path, &config.store.app_id)
        .await
        .with_context(|| format!("failed to open journal store at {path}"))?;
    Ok(journal.with_poll_interval(config.store.poll_interval()))
}
