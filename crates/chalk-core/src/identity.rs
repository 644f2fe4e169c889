use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The principal that owns journal entries.
///
/// Produced by `chalk-auth`, read by the orchestrator. Contains only data,
/// no sign-in logic.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Opaque user id (JWT `sub` claim or an anonymous uid).
    pub user_id: String,
    /// `true` for a custom-token sign-in, `false` for an anonymous one.
    pub authenticated: bool,
}

impl SessionIdentity {
    #[must_use]
    pub fn anonymous(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            authenticated: false,
        }
    }

    #[must_use]
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            authenticated: true,
        }
    }
}

/// Lifecycle of the session identity.
///
/// ```text
/// pending → signed_in(identity)
///         → signed_out
/// ```
///
/// `Pending` (sign-in has not finished) is distinct from `SignedOut`
/// (sign-in finished without an identity).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "state", content = "identity")]
pub enum IdentityState {
    #[default]
    Pending,
    SignedOut,
    SignedIn(SessionIdentity),
}

impl IdentityState {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The identity, when signed in.
    #[must_use]
    pub const fn identity(&self) -> Option<&SessionIdentity> {
        match self {
            Self::SignedIn(identity) => Some(identity),
            Self::Pending | Self::SignedOut => None,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::SignedOut => "signed_out",
            Self::SignedIn(_) => "signed_in",
        }
    }
}
