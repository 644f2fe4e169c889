use chalk_auth::AuthError;
use chalk_core::CoreError;
use chalk_db::error::DatabaseError;
use thiserror::Error;

/// Why a submission produced no entry.
///
/// Analysis failures are absent on purpose: they degrade into placeholder
/// values and the entry is still saved.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("a submission is already in progress")]
    Busy,

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The store's message, unchanged.
    #[error(transparent)]
    Persist(#[from] DatabaseError),
}
