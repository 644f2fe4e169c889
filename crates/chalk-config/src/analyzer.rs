//! Language-model (Gemini) configuration.

use serde::{Deserialize, Serialize};

fn default_model() -> String {
    "gemini-2.5-flash-preview-05-20".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

/// Default per-attempt timeout in seconds.
const fn default_attempt_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyzerConfig {
    /// Gemini API key.
    #[serde(default)]
    pub api_key: String,

    /// Model name used in the `generateContent` path.
    #[serde(default = "default_model")]
    pub model: String,

    /// API origin. Overridden in tests to point at a local server.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound for a single analysis attempt, in seconds.
    #[serde(default = "default_attempt_timeout_secs")]
    pub attempt_timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            attempt_timeout_secs: default_attempt_timeout_secs(),
        }
    }
}

impl AnalyzerConfig {
    /// Check if an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    #[must_use]
    pub const fn attempt_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.attempt_timeout_secs)
    }
}
