//! Session sign-in state.
//!
//! `SessionAuth` owns the current [`IdentityState`] and broadcasts every change
//! on a `tokio::sync::watch` channel. It starts `Pending`; `sign_in` moves it to
//! `SignedIn` or, when sign-in fails, to `SignedOut`.

use chalk_config::AuthConfig;
use chalk_core::identity::{IdentityState, SessionIdentity};
use tokio::sync::watch;

use crate::IdentityProvider;
use crate::error::AuthError;
use crate::{anonymous, custom_token};

pub struct SessionAuth {
    state: watch::Sender<IdentityState>,
}

impl Default for SessionAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionAuth {
    /// A provider whose identity is not yet established.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(IdentityState::Pending);
        Self { state }
    }

    /// A provider that is already signed in as `identity`.
    #[must_use]
    pub fn signed_in(identity: SessionIdentity) -> Self {
        let (state, _) = watch::channel(IdentityState::SignedIn(identity));
        Self { state }
    }

    /// Sign in with the configured custom token, or anonymously when none is set.
    ///
    /// On failure the state becomes `SignedOut` and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the token is invalid or expired, or the anonymous
    /// uid cannot be loaded or stored.
    pub fn sign_in(&self, config: &AuthConfig) -> Result<SessionIdentity, AuthError> {
        let result = if config.has_custom_token() {
            sign_in_with_custom_token(&config.custom_token)
        } else {
            tracing::debug!("no custom token configured; signing in anonymously");
            anonymous::load_or_create().map(SessionIdentity::anonymous)
        };

        match result {
            Ok(identity) => {
                tracing::info!(
                    user_id = %identity.user_id,
                    authenticated = identity.authenticated,
                    "signed in"
                );
                self.establish(identity.clone());
                Ok(identity)
            }
            Err(error) => {
                tracing::error!(%error, "sign-in failed");
                self.sign_out();
                Err(error)
            }
        }
    }

    /// Publish `identity` as the signed-in principal.
    pub fn establish(&self, identity: SessionIdentity) {
        self.state.send_replace(IdentityState::SignedIn(identity));
    }

    /// Drop the current identity.
    pub fn sign_out(&self) {
        self.state.send_replace(IdentityState::SignedOut);
    }
}

fn sign_in_with_custom_token(token: &str) -> Result<SessionIdentity, AuthError> {
    let claims = custom_token::decode_claims(token)?;
    if let Some(expires_at) = claims.expires_at
        && claims.is_expired(chrono::Utc::now())
    {
        return Err(AuthError::TokenExpired(expires_at));
    }
    Ok(SessionIdentity::authenticated(claims.user_id))
}

impl IdentityProvider for SessionAuth {
    fn current_identity(&self) -> IdentityState {
        self.state.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<IdentityState> {
        self.state.subscribe()
    }
}
