//! Cross-cutting error types for chalk.
//!
//! Domain-specific errors (`AuthError`, `AnalyzeError`, `DatabaseError`) live in
//! their own crates. The binary converges them through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any chalk crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input failed validation (e.g. an empty journal entry).
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Trim journal text and reject it when nothing remains.
///
/// # Errors
///
/// Returns `CoreError::Validation` for empty or whitespace-only text.
pub fn validate_entry_text(text: &str) -> Result<&str, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Please write something before saving.".into(),
        ));
    }
    Ok(trimmed)
}
