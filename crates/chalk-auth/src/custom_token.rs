use base64::Engine as _;
use chrono::{DateTime, Utc};

use crate::error::AuthError;

/// Claims read from a custom sign-in token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// `sub` claim, used as the owner id.
    pub user_id: String,
    /// `exp` claim, when present.
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenClaims {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Decode the payload of a JWT-shaped custom token.
///
/// Signature verification belongs to the issuing backend; this only reads
/// `sub` and `exp`.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` if the token is not three dot-separated
/// segments, the payload is not base64url JSON, or `sub` is missing.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::InvalidToken("invalid JWT format".into()));
    }
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| AuthError::InvalidToken(format!("base64 decode failed: {e}")))?;
    let value: serde_json::Value = serde_json::from_slice(&payload)
        .map_err(|e| AuthError::InvalidToken(format!("JSON parse failed: {e}")))?;

    let user_id = value["sub"]
        .as_str()
        .filter(|sub| !sub.is_empty())
        .ok_or_else(|| AuthError::InvalidToken("missing sub claim".into()))?
        .to_string();

    let expires_at = match value.get("exp") {
        None => None,
        Some(exp) => {
            let secs = exp
                .as_i64()
                .ok_or_else(|| AuthError::InvalidToken("exp claim is not an integer".into()))?;
            Some(
                DateTime::from_timestamp(secs, 0)
                    .ok_or_else(|| AuthError::InvalidToken("invalid exp timestamp".into()))?,
            )
        }
    };

    Ok(TokenClaims {
        user_id,
        expires_at,
    })
}
