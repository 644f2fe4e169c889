//! Anonymous uid storage.
//!
//! An anonymous sign-in reuses the uid minted on first run so entries stay
//! visible across runs. Lookup order: keyring → `CHALK_AUTH__ANON_UID` env →
//! `~/.chalk/anonymous-uid`.

use std::fs;
use std::path::PathBuf;

use chalk_core::ids::{PREFIX_ANON_USER, format_id};

use crate::error::AuthError;

const DEFAULT_KEYRING_SERVICE: &str = "chalk-cli";
const KEYRING_USER: &str = "anonymous-uid";
const UID_FILE_NAME: &str = "anonymous-uid";
const UID_ENV: &str = "CHALK_AUTH__ANON_UID";

/// Returns the keyring service name.
///
/// Override via `CHALK_KEYRING_SERVICE` (e.g. `"chalk-cli-test"`) to keep test
/// runs away from the real uid.
fn keyring_service() -> String {
    std::env::var("CHALK_KEYRING_SERVICE").unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

/// Mint a fresh anonymous uid, e.g. `anon-3f9a0c1b7d2e4f60`.
///
/// # Errors
///
/// Returns `AuthError::UidStore` if the OS random source is unavailable.
pub fn mint_uid() -> Result<String, AuthError> {
    let mut bytes = [0u8; 8];
    getrandom::fill(&mut bytes)
        .map_err(|e| AuthError::UidStore(format!("random source unavailable: {e}")))?;
    let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    Ok(format_id(PREFIX_ANON_USER, &hex))
}

/// Return the stored uid, minting and storing a new one on first use.
///
/// # Errors
///
/// Returns `AuthError::UidStore` if minting fails or the uid cannot be stored.
pub fn load_or_create() -> Result<String, AuthError> {
    if let Some(uid) = load() {
        return Ok(uid);
    }
    let uid = mint_uid()?;
    store(&uid)?;
    tracing::info!(user_id = %uid, "minted anonymous uid");
    Ok(uid)
}

/// Load the stored uid.
#[must_use]
pub fn load() -> Option<String> {
    // 1. Keyring
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
        && let Ok(uid) = entry.get_password()
        && !uid.trim().is_empty()
    {
        return Some(uid.trim().to_string());
    }

    // 2. Environment variable
    if let Ok(uid) = std::env::var(UID_ENV)
        && !uid.trim().is_empty()
    {
        return Some(uid.trim().to_string());
    }

    // 3. File fallback
    load_file()
}

/// Store the uid in the OS keychain, falling back to a file.
///
/// # Errors
///
/// Returns `AuthError::UidStore` if both keyring and file storage fail.
pub fn store(uid: &str) -> Result<(), AuthError> {
    match keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        Ok(entry) => match entry.set_password(uid) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!(%error, "keyring store failed; falling back to file");
                store_file(uid)
            }
        },
        Err(error) => {
            tracing::warn!(%error, "keyring unavailable; falling back to file");
            store_file(uid)
        }
    }
}

/// Forget the stored uid. The next anonymous sign-in mints a new one.
///
/// # Errors
///
/// Returns `AuthError::UidStore` if the uid file cannot be removed.
pub fn delete() -> Result<(), AuthError> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        let _ = entry.delete_credential();
    }

    let path = uid_path()?;
    if path.exists() {
        fs::remove_file(&path).map_err(|e| {
            AuthError::UidStore(format!("failed to delete {}: {e}", path.display()))
        })?;
    }
    Ok(())
}

/// Which tier the current uid came from (for `chalk whoami`).
#[must_use]
pub fn detect_uid_source() -> Option<String> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
        && entry.get_password().is_ok_and(|uid| !uid.trim().is_empty())
    {
        return Some("keyring".into());
    }
    if std::env::var(UID_ENV).is_ok_and(|uid| !uid.trim().is_empty()) {
        return Some("env".into());
    }
    if load_file().is_some() {
        return Some("file".into());
    }
    None
}

// --- Private file helpers ---

fn uid_path() -> Result<PathBuf, AuthError> {
    dirs::home_dir()
        .map(|h| h.join(".chalk").join(UID_FILE_NAME))
        .ok_or_else(|| AuthError::UidStore("home directory not found — cannot store uid".into()))
}

fn store_file(uid: &str) -> Result<(), AuthError> {
    let path = uid_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AuthError::UidStore(format!("mkdir {}: {e}", parent.display())))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(&path, uid)
        .map_err(|e| AuthError::UidStore(format!("write {}: {e}", path.display())))
}

fn load_file() -> Option<String> {
    let path = uid_path().ok()?;
    fs::read_to_string(&path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
