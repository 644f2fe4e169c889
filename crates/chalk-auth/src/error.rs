use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("sign-in did not finish within {0:?}")]
    Pending(std::time::Duration),

    #[error("not signed in — run `chalk auth reset` or configure CHALK_AUTH__CUSTOM_TOKEN")]
    NotAuthenticated,

    #[error("custom token expired at {0}")]
    TokenExpired(chrono::DateTime<chrono::Utc>),

    #[error("invalid custom token: {0}")]
    InvalidToken(String),

    #[error("anonymous uid store error: {0}")]
    UidStore(String),

    #[error("identity provider closed")]
    ProviderClosed,
}
