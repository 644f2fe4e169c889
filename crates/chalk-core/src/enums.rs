//! Submission state machine.
//!
//! Published by the orchestrator on every transition so the presentation layer
//! can disable input and show status text.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which stage a failed submission stopped at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// The identity was gone when persistence began.
    Auth,
    /// The store rejected the write.
    Persist,
}

impl FailureStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Persist => "persist",
        }
    }
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A terminal failure of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SubmissionFailure {
    pub stage: FailureStage,
    pub message: String,
}

/// State of the current submission.
///
/// ```text
/// idle → analyzing → saving → idle
///                  → analysis_failed → saving → idle
///                                             → failed
///                             saving → failed
/// ```
///
/// `AnalysisFailed` is transient: the entry is still saved with placeholder
/// values. `Failed` is terminal for the submission; the next submit starts
/// again at `Analyzing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", tag = "state", content = "detail")]
pub enum SubmissionState {
    #[default]
    Idle,
    Analyzing,
    AnalysisFailed(String),
    Saving,
    Failed(SubmissionFailure),
}

impl SubmissionState {
    /// Whether a submission is in flight (input should be disabled).
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Analyzing | Self::AnalysisFailed(_) | Self::Saving)
    }

    /// Status text shown to the user.
    #[must_use]
    pub fn status_text(&self) -> String {
        match self {
            Self::Idle => String::new(),
            Self::Analyzing => "Analyzing sentiment and generating feedback...".into(),
            Self::AnalysisFailed(_) => "Sentiment: Error analyzing.".into(),
            Self::Saving => "Saving entry...".into(),
            Self::Failed(failure) => match failure.stage {
                FailureStage::Persist => "Error saving entry. Please try again.".into(),
                FailureStage::Auth => "Not signed in. Entry was not saved.".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_only_while_in_flight() {
        assert!(!SubmissionState::Idle.is_busy());
        assert!(SubmissionState::Analyzing.is_busy());
        assert!(SubmissionState::AnalysisFailed("timeout".into()).is_busy());
        assert!(SubmissionState::Saving.is_busy());
        assert!(
            !SubmissionState::Failed(SubmissionFailure {
                stage: FailureStage::Persist,
                message: "disk full".into(),
            })
            .is_busy()
        );
    }

    #[test]
    fn persist_failure_status_text() {
        let state = SubmissionState::Failed(SubmissionFailure {
            stage: FailureStage::Persist,
            message: "disk full".into(),
        });
        assert_eq!(state.status_text(), "Error saving entry. Please try again.");
    }
}
