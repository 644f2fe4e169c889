//! Sentinel strings substituted when analysis is unavailable.

/// Sentiment stored when the analysis call failed after all retries.
pub const ANALYSIS_FAILED_SENTIMENT: &str = "Error analyzing";

/// Prefix of the feedback stored when the analysis call failed.
pub const ANALYSIS_FAILED_FEEDBACK_PREFIX: &str = "Error generating feedback: ";

/// Sentiment used when the model reply had no `Sentiment:` line.
pub const SENTIMENT_UNAVAILABLE: &str = "Could not analyze.";

/// Feedback used when the model reply had no `Feedback:` line.
pub const FEEDBACK_UNAVAILABLE: &str = "No feedback generated.";

/// Shown for entries that carry no sentiment.
pub const NOT_ANALYZED: &str = "Not analyzed";

/// Feedback placeholder for a failed analysis.
#[must_use]
pub fn analysis_failed_feedback(error: &str) -> String {
    format!("{ANALYSIS_FAILED_FEEDBACK_PREFIX}{error}")
}
