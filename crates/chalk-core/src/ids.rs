//! ID prefix constants.
//!
//! Store-assigned IDs have the form `{prefix}-{8 hex chars}`, e.g. `jrn-a3f8b2c1`.

/// Journal entries.
pub const PREFIX_ENTRY: &str = "jrn";

/// Anonymous user ids minted by the auth crate.
pub const PREFIX_ANON_USER: &str = "anon";

/// Format an ID from a prefix and a hex suffix.
#[must_use]
pub fn format_id(prefix: &str, hex: &str) -> String {
    format!("{prefix}-{hex}")
}
