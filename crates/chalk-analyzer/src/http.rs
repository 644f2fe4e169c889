//! Shared HTTP response checks.
//!
//! Maps 429 to [`AnalyzeError::RateLimited`] (with `Retry-After` parsing) and
//! any other non-success status to [`AnalyzeError::Api`], pulling the message
//! from the Google-style `{"error": {"message": ...}}` body when present.

use crate::error::AnalyzeError;

/// Check an HTTP response for error statuses. Returns it unchanged on success.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, AnalyzeError> {
    if resp.status() == 429 {
        return Err(AnalyzeError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
        return Err(AnalyzeError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp)
}

/// Parse the `Retry-After` header as seconds, falling back to 60 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(60)
}

/// Extract `error.message` from an API error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value["error"]["message"]
        .as_str()
        .filter(|m| !m.is_empty())
        .map(String::from)
}
