//! Submitted text → analysis → persisted entry.
//!
//! One submission at a time: a second `submit` while one is in flight is
//! rejected with [`SubmitError::Busy`]. Every transition is published on a
//! `watch` channel so the presentation layer can disable input and show
//! status text.
//!
//! ```text
//! submit ─ validate ─ wait for identity ─ Analyzing ─┬─ ok ──────────────┬─ Saving ─┬─ Idle
//!                                                    └─ AnalysisFailed ──┘          └─ Failed
//! ```

use std::time::Duration;

use chalk_analyzer::{AnalyzeError, Analyzer};
use chalk_auth::{AuthError, IdentityProvider};
use chalk_config::{ChalkConfig, ConfigError};
use chalk_core::entities::{AnalysisResult, JournalEntry, NewJournalEntry};
use chalk_core::enums::{FailureStage, SubmissionFailure, SubmissionState};
use chalk_core::errors::validate_entry_text;
use chalk_core::identity::SessionIdentity;
use chalk_db::JournalStore;
use tokio::sync::{Mutex, watch};

use crate::error::SubmitError;
use crate::retry::{self, RetryPolicy};

/// Timing knobs for [`AnalysisOrchestrator`].
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub retry: RetryPolicy,
    /// Bound on a single analysis attempt. A timeout counts as a failed attempt.
    pub attempt_timeout: Duration,
    /// How long to wait for sign-in to finish before refusing a submission.
    pub auth_wait_timeout: Duration,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            attempt_timeout: Duration::from_secs(30),
            auth_wait_timeout: Duration::from_secs(10),
        }
    }
}

impl OrchestratorSettings {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the retry section is invalid.
    pub fn from_config(config: &ChalkConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            retry: RetryPolicy::try_from(&config.retry)?,
            attempt_timeout: config.analyzer.attempt_timeout(),
            auth_wait_timeout: config.auth.wait_timeout(),
        })
    }
}

/// A saved submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub entry: JournalEntry,
    /// Set when analysis failed and the entry carries placeholder values.
    pub analysis_error: Option<String>,
}

impl SubmitOutcome {
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.analysis_error.is_some()
    }
}

pub struct AnalysisOrchestrator<A, S, I> {
    analyzer: A,
    store: S,
    identity: I,
    settings: OrchestratorSettings,
    state: watch::Sender<SubmissionState>,
    in_flight: Mutex<()>,
}

impl<A, S, I> AnalysisOrchestrator<A, S, I>
where
    A: Analyzer,
    S: JournalStore,
    I: IdentityProvider,
{
    pub fn new(analyzer: A, store: S, identity: I, settings: OrchestratorSettings) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            analyzer,
            store,
            identity,
            settings,
            state,
            in_flight: Mutex::new(()),
        }
    }

    /// Receive every state transition, starting from the current state.
    pub fn states(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    pub const fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn identity(&self) -> &I {
        &self.identity
    }

    /// Analyze `text` and save it for the signed-in user.
    ///
    /// Analysis that still fails after every retry does not fail the
    /// submission: the entry is saved with placeholder values and the error
    /// is reported in [`SubmitOutcome::analysis_error`].
    ///
    /// # Errors
    ///
    /// - `Validation` for empty or whitespace-only text
    /// - `Busy` while another submission is in flight
    /// - `Auth` if sign-in never finished, or no one is signed in when saving
    ///   begins
    /// - `Persist` if the store rejects the write
    ///
    /// Only the last two change the published state.
    pub async fn submit(&self, text: &str) -> Result<SubmitOutcome, SubmitError> {
        let text = validate_entry_text(text)?;
        let Ok(_in_flight) = self.in_flight.try_lock() else {
            tracing::debug!("submission rejected, another is in flight");
            return Err(SubmitError::Busy);
        };

        let identity = self.wait_for_identity().await?;
        tracing::debug!(user_id = %identity.user_id, chars = text.len(), "analyzing entry");
        self.publish(SubmissionState::Analyzing);

        let (analysis, analysis_error) = match self.analyze(text).await {
            Ok(analysis) => (analysis, None),
            Err(error) => {
                let message = error.to_string();
                tracing::warn!(%error, "analysis failed, saving with placeholders");
                self.publish(SubmissionState::AnalysisFailed(message.clone()));
                (AnalysisResult::failed(&message), Some(message))
            }
        };

        self.publish(SubmissionState::Saving);

        // The owner is whoever is signed in now, not when analysis started.
        let state = self.identity.current_identity();
        let Some(owner) = state.identity() else {
            let error = AuthError::NotAuthenticated;
            tracing::error!(state = state.as_str(), "identity lost before saving");
            self.fail(FailureStage::Auth, error.to_string());
            return Err(error.into());
        };

        let draft = NewJournalEntry::analyzed(text, analysis, &owner.user_id);
        match self.store.append(draft).await {
            Ok(entry) => {
                tracing::info!(entry = %entry.id, owner = %entry.owner_id, degraded = analysis_error.is_some(), "entry saved");
                self.publish(SubmissionState::Idle);
                Ok(SubmitOutcome {
                    entry,
                    analysis_error,
                })
            }
            Err(error) => {
                tracing::error!(%error, "saving entry failed");
                self.fail(FailureStage::Persist, error.to_string());
                Err(SubmitError::Persist(error))
            }
        }
    }

    /// Block until sign-in has finished, bounded by `auth_wait_timeout`.
    async fn wait_for_identity(&self) -> Result<SessionIdentity, AuthError> {
        let timeout = self.settings.auth_wait_timeout;
        let mut identities = self.identity.subscribe();

        let state = match tokio::time::timeout(
            timeout,
            identities.wait_for(|state| !state.is_pending()),
        )
        .await
        {
            Ok(Ok(state)) => state.clone(),
            Ok(Err(_)) => return Err(AuthError::ProviderClosed),
            Err(_) => return Err(AuthError::Pending(timeout)),
        };

        state.identity().cloned().ok_or(AuthError::NotAuthenticated)
    }

    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalyzeError> {
        let timeout = self.settings.attempt_timeout;
        retry::run(&self.settings.retry, || async move {
            tokio::time::timeout(timeout, self.analyzer.analyze(text))
                .await
                .map_err(|_| AnalyzeError::Timeout(timeout))?
        })
        .await
    }

    fn fail(&self, stage: FailureStage, message: String) {
        self.publish(SubmissionState::Failed(SubmissionFailure { stage, message }));
    }

    fn publish(&self, state: SubmissionState) {
        self.state.send_replace(state);
    }
}
