//! Request construction for `generateContent`.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

/// Instruction sent with every entry. The reply format is what
/// [`crate::response::parse_analysis`] expects.
#[must_use]
pub fn build_prompt(entry: &str) -> String {
    format!(
        "Based on the following journal entry, provide a sentiment analysis (e.g., Positive, \
         Neutral, Negative) and then offer a brief, empathetic, and constructive piece of \
         feedback or insight. Focus on encouraging self-reflection or offering a supportive \
         perspective. Format your response clearly with 'Sentiment:' and 'Feedback:' prefixes \
         on separate lines.\n    Journal Entry: \"{entry}\""
    )
}

/// A single-turn user request carrying the prompt for `entry`.
#[must_use]
pub fn build_request(entry: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part {
                text: build_prompt(entry),
            }],
        }],
    }
}
