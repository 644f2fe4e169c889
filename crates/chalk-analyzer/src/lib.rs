//! # chalk-analyzer
//!
//! Sentiment and feedback analysis for journal entries through the Gemini
//! `generateContent` API.
//!
//! [`Analyzer`] is the seam the orchestrator calls; [`GeminiClient`] is the
//! HTTP implementation. One `analyze` call is one attempt: retries and the
//! per-attempt timeout are applied by the caller.

pub mod prompt;
pub mod response;

mod error;
mod http;

pub use error::AnalyzeError;

use std::future::Future;
use std::time::Duration;

use chalk_config::AnalyzerConfig;
use chalk_core::entities::AnalysisResult;

use crate::http::check_response;
use crate::response::GenerateContentResponse;

/// Produces an [`AnalysisResult`] for a journal entry.
pub trait Analyzer: Send + Sync {
    /// Run one analysis attempt.
    fn analyze(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<AnalysisResult, AnalyzeError>> + Send;
}

/// HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GeminiClient {
    /// Build a client from the analyzer config section.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::NotConfigured`] when no API key is set, or
    /// [`AnalyzeError::Http`] if the underlying client cannot be built.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalyzeError> {
        if !config.is_configured() {
            return Err(AnalyzeError::NotConfigured);
        }
        let http = reqwest::Client::builder()
            .user_agent("chalk/0.1")
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint_url(config),
        })
    }
}

/// `{base}/v1beta/models/{model}:generateContent?key={key}`
fn endpoint_url(config: &AnalyzerConfig) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent?key={}",
        config.base_url.trim_end_matches('/'),
        urlencoding::encode(&config.model),
        urlencoding::encode(config.api_key.trim()),
    )
}

impl Analyzer for GeminiClient {
    async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalyzeError> {
        let request = prompt::build_request(text);
        let resp = check_response(self.http.post(&self.endpoint).json(&request).send().await?)
            .await?;

        let body = resp.text().await?;
        let decoded: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| AnalyzeError::Parse(e.to_string()))?;
        Ok(response::interpret(&decoded))
    }
}
