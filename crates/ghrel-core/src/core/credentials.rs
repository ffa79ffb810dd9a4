use crate::core::{GhrelError, GhrelResult};
use keyring::{Entry, Error as KeyringError};

/// Service name under which ghrel secrets are filed
const KEYRING_SERVICE: &str = "ghrel";

/// Keychain entry holding the GitHub token
pub const GITHUB_TOKEN_KEY: &str = "github_token";

/// OS keychain access for ghrel secrets
///
/// Backed by the macOS Keychain, the Windows Credential Manager or the
/// Secret Service on Linux, depending on the platform.
pub struct CredentialStore;

impl CredentialStore {
    fn entry(key: &str) -> GhrelResult<Entry> {
        Entry::new(KEYRING_SERVICE, key).map_err(|e| {
            GhrelError::Credential(format!("Cannot open keychain entry '{}': {}", key, e))
        })
    }

    /// Save `value` under `key`, replacing any previous value
    pub fn store(key: &str, value: &str) -> GhrelResult<()> {
        Self::entry(key)?.set_password(value).map_err(|e| {
            GhrelError::Credential(format!("Cannot save '{}' to keychain: {}", key, e))
        })
    }

    /// Read the value under `key`; a missing entry is `Ok(None)`
    pub fn retrieve(key: &str) -> GhrelResult<Option<String>> {
        match Self::entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(KeyringError::NoEntry) => Ok(None),
            Err(e) => Err(GhrelError::Credential(format!(
                "Cannot read '{}' from keychain: {}",
                key, e
            ))),
        }
    }

    /// Remove `key`; removing a missing entry succeeds
    pub fn delete(key: &str) -> GhrelResult<()> {
        match Self::entry(key)?.delete_credential() {
            Ok(()) | Err(KeyringError::NoEntry) => Ok(()),
            Err(e) => Err(GhrelError::Credential(format!(
                "Cannot remove '{}' from keychain: {}",
                key, e
            ))),
        }
    }

    pub fn exists(key: &str) -> bool {
        matches!(Self::retrieve(key), Ok(Some(_)))
    }

    /// Save the GitHub token used for API and upload calls
    pub fn store_github_token(token: &str) -> GhrelResult<()> {
        Self::store(GITHUB_TOKEN_KEY, token)
    }

    /// The saved GitHub token.
    ///
    /// An unreachable keychain reads as no token, so callers can fall back
    /// to other sources.
    pub fn github_token() -> Option<String> {
        Self::retrieve(GITHUB_TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|t| !t.trim().is_empty())
    }
}
