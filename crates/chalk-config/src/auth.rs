//! Sign-in configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const fn default_wait_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Custom sign-in token (JWT). Empty means sign in anonymously.
    #[serde(default)]
    pub custom_token: String,

    /// How long a submission waits for sign-in to finish, in seconds.
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            custom_token: String::new(),
            wait_timeout_secs: default_wait_timeout_secs(),
        }
    }
}

impl AuthConfig {
    /// Whether a custom token is configured (otherwise anonymous sign-in).
    pub fn has_custom_token(&self) -> bool {
        !self.custom_token.trim().is_empty()
    }

    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}
