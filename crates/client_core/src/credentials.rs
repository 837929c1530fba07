//! Best-effort persistence for the operator's API key.
//!
//! Credential storage is a convenience, not a correctness requirement: both
//! operations absorb storage failures and the session simply continues
//! unauthenticated when nothing can be read back.

use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

pub trait CredentialStore: Send + Sync {
    /// Returns the stored key, or the empty string when nothing is stored
    /// or the store is unreadable.
    fn load(&self) -> String;
    /// Persists the key. Failures are logged and swallowed.
    fn save(&self, key: &str);
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    fraudshield_api_key: String,
}

/// Stores the single `fraudshield_api_key` pair as a TOML file.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> String {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return String::new();
        };
        toml::from_str::<CredentialsFile>(&raw)
            .map(|file| file.fraudshield_api_key)
            .unwrap_or_default()
    }

    fn save(&self, key: &str) {
        let file = CredentialsFile {
            fraudshield_api_key: key.to_string(),
        };
        let raw = match toml::to_string(&file) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(path = %self.path.display(), "credential save skipped: {err}");
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(err) = fs::create_dir_all(parent) {
                    warn!(path = %self.path.display(), "credential save skipped: {err}");
                    return;
                }
            }
        }
        if let Err(err) = fs::write(&self.path, raw) {
            warn!(path = %self.path.display(), "credential save skipped: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_saved_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileCredentialStore::new(dir.path().join("credentials.toml"));

        store.save("sk-live-123");
        assert_eq!(store.load(), "sk-live-123");
    }

    #[test]
    fn load_returns_empty_when_file_is_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileCredentialStore::new(dir.path().join("absent.toml"));

        assert_eq!(store.load(), "");
    }

    #[test]
    fn load_returns_empty_on_malformed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("credentials.toml");
        fs::write(&path, "not [valid toml").expect("write");

        assert_eq!(FileCredentialStore::new(path).load(), "");
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("credentials.toml");
        let store = FileCredentialStore::new(path);

        store.save("sk-live-456");
        assert_eq!(store.load(), "sk-live-456");
    }

    #[test]
    fn save_swallows_unwritable_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "occupied").expect("write");
        // Parent "directory" is a regular file, so create_dir_all must fail.
        let store = FileCredentialStore::new(blocker.join("credentials.toml"));

        store.save("sk-live-789");
        assert_eq!(store.load(), "");
    }
}
