use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::placeholders::{
    ANALYSIS_FAILED_SENTIMENT, FEEDBACK_UNAVAILABLE, SENTIMENT_UNAVAILABLE,
    analysis_failed_feedback,
};

/// A persisted journal entry.
///
/// `id` and `created_at` are assigned by the store. `owner_id` is fixed at
/// creation. Entries are never edited after they are written.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct JournalEntry {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub sentiment: Option<String>,
    pub feedback: Option<String>,
    pub owner_id: String,
}

/// An entry that has not been written yet.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewJournalEntry {
    pub text: String,
    pub sentiment: Option<String>,
    pub feedback: Option<String>,
    pub owner_id: String,
}

impl NewJournalEntry {
    /// Attach an analysis result to `text` for `owner_id`.
    #[must_use]
    pub fn analyzed(text: &str, analysis: AnalysisResult, owner_id: &str) -> Self {
        Self {
            text: text.to_string(),
            sentiment: Some(analysis.sentiment),
            feedback: Some(analysis.feedback),
            owner_id: owner_id.to_string(),
        }
    }
}

/// Sentiment and feedback produced for one entry. Never stored on its own.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AnalysisResult {
    pub sentiment: String,
    pub feedback: String,
}

impl AnalysisResult {
    #[must_use]
    pub fn new(sentiment: impl Into<String>, feedback: impl Into<String>) -> Self {
        Self {
            sentiment: sentiment.into(),
            feedback: feedback.into(),
        }
    }

    /// The values stored when the model reply could not be interpreted.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(SENTIMENT_UNAVAILABLE, FEEDBACK_UNAVAILABLE)
    }

    /// The values stored when analysis failed after all retries.
    #[must_use]
    pub fn failed(error: &str) -> Self {
        Self::new(ANALYSIS_FAILED_SENTIMENT, analysis_failed_feedback(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_analysis_keeps_error_message() {
        let result = AnalysisResult::failed("API call failed with status: 503");
        assert_eq!(result.sentiment, "Error analyzing");
        assert_eq!(
            result.feedback,
            "Error generating feedback: API call failed with status: 503"
        );
    }

    #[test]
    fn analyzed_draft_carries_all_fields() {
        let draft = NewJournalEntry::analyzed(
            "walked by the river",
            AnalysisResult::new("Positive", "Keep it up."),
            "anon-1234abcd",
        );
        assert_eq!(draft.text, "walked by the river");
        assert_eq!(draft.sentiment.as_deref(), Some("Positive"));
        assert_eq!(draft.feedback.as_deref(), Some("Keep it up."));
        assert_eq!(draft.owner_id, "anon-1234abcd");
    }
}
