//! # chalk-auth
//!
//! Sign-in for chalk.
//!
//! Provides anonymous sign-in (a uid stored via `keyring` with env and file
//! fallbacks), custom-token sign-in (JWT `sub` claim), and a watch-based
//! subscription to identity changes.

pub mod anonymous;
pub mod custom_token;
pub mod error;
pub mod session;

pub use error::AuthError;
pub use session::SessionAuth;

use chalk_core::identity::IdentityState;
use tokio::sync::watch;

/// Source of the current session identity.
///
/// The orchestrator only reads identities; it never changes them.
pub trait IdentityProvider: Send + Sync {
    /// The identity as of now (may be `Pending`).
    fn current_identity(&self) -> IdentityState;

    /// Receive every subsequent identity change.
    fn subscribe(&self) -> watch::Receiver<IdentityState>;
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for &T {
    fn current_identity(&self) -> IdentityState {
        (**self).current_identity()
    }

    fn subscribe(&self) -> watch::Receiver<IdentityState> {
        (**self).subscribe()
    }
}

/// Forget the anonymous uid so the next anonymous sign-in mints a new one.
///
/// # Errors
///
/// Returns `AuthError::UidStore` if the uid file cannot be removed.
pub fn reset_anonymous() -> Result<(), AuthError> {
    anonymous::delete()
}
