//! Reply interpretation.
//!
//! The model is asked for `Sentiment:` and `Feedback:` lines. The first line
//! with each prefix wins; a missing line or an unexpected reply structure
//! yields the "unavailable" values rather than an error.

use chalk_core::entities::AnalysisResult;
use chalk_core::placeholders::{FEEDBACK_UNAVAILABLE, SENTIMENT_UNAVAILABLE};
use serde::Deserialize;

const SENTIMENT_PREFIX: &str = "Sentiment:";
const FEEDBACK_PREFIX: &str = "Feedback:";

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

/// Turn a decoded reply into an analysis.
#[must_use]
pub fn interpret(response: &GenerateContentResponse) -> AnalysisResult {
    match response.first_text() {
        Some(text) => parse_analysis(text),
        None => {
            tracing::error!(
                candidates = response.candidates.len(),
                "unexpected generateContent response structure"
            );
            AnalysisResult::unavailable()
        }
    }
}

/// Extract sentiment and feedback from the model's plain-text reply.
#[must_use]
pub fn parse_analysis(text: &str) -> AnalysisResult {
    let sentiment = first_prefixed(text, SENTIMENT_PREFIX);
    let feedback = first_prefixed(text, FEEDBACK_PREFIX);
    AnalysisResult::new(
        sentiment.unwrap_or(SENTIMENT_UNAVAILABLE),
        feedback.unwrap_or(FEEDBACK_UNAVAILABLE),
    )
}

fn first_prefixed<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    text.lines()
        .find_map(|line| line.trim_start().strip_prefix(prefix))
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const FIXTURE: &str = r#"{
        "candidates": [
            {
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Sentiment: Positive\nFeedback: It sounds like the walk helped. Notice what made today lighter." }
                    ]
                },
                "finishReason": "STOP"
            }
        ],
        "usageMetadata": { "promptTokenCount": 81 }
    }"#;

    #[test]
    fn parses_fixture_reply() {
        let response: GenerateContentResponse = serde_json::from_str(FIXTURE).unwrap();
        let analysis = interpret(&response);
        assert_eq!(analysis.sentiment, "Positive");
        assert_eq!(
            analysis.feedback,
            "It sounds like the walk helped. Notice what made today lighter."
        );
    }

    #[test]
    fn first_matching_line_wins() {
        let analysis = parse_analysis(
            "Sentiment: Neutral\nFeedback: first\nSentiment: Negative\nFeedback: second",
        );
        assert_eq!(analysis.sentiment, "Neutral");
        assert_eq!(analysis.feedback, "first");
    }

    #[test]
    fn missing_lines_use_unavailable_values() {
        let analysis = parse_analysis("I am not sure how to respond to that.");
        assert_eq!(analysis, AnalysisResult::unavailable());

        let analysis = parse_analysis("Sentiment: Mixed");
        assert_eq!(analysis.sentiment, "Mixed");
        assert_eq!(analysis.feedback, "No feedback generated.");
    }

    #[test]
    fn leading_whitespace_and_blank_lines_are_tolerated() {
        let analysis = parse_analysis("\n  Sentiment:   Negative  \n\n  Feedback: Rest tonight.\n");
        assert_eq!(analysis.sentiment, "Negative");
        assert_eq!(analysis.feedback, "Rest tonight.");
    }

    #[test]
    fn empty_candidates_are_unavailable() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert_eq!(interpret(&response), AnalysisResult::unavailable());
    }

    #[test]
    fn candidate_without_parts_is_unavailable() {
        let response: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"role":"model"}}]}"#).unwrap();
        assert_eq!(interpret(&response), AnalysisResult::unavailable());
    }
}
