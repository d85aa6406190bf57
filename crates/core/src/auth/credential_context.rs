use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Operator credential, passed explicitly to whatever talks to the backend.
///
/// Hydrates from the credential file the login shell persists and clears on
/// logout. Deliberately not a module-global: everything that needs the
/// token receives the context.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CredentialContext {
    token: Option<String>,
}

impl CredentialContext {
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Bearer token to attach, if the operator is signed in.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn credential_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceWatch").join("credential.json"))
    }

    /// Hydrate from the persisted credential; anonymous when absent or
    /// unreadable (the shell will redirect to login on the first 401).
    pub fn hydrate() -> Self {
        Self::credential_path()
            .map(|path| Self::hydrate_from(&path))
            .unwrap_or_default()
    }

    pub fn hydrate_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn persist(&self) {
        if let Some(path) = Self::credential_path() {
            self.persist_to(&path);
        }
    }

    pub fn persist_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = fs::write(path, json);
        }
    }

    /// Logout teardown: forget the token and remove the persisted file.
    pub fn clear(&mut self) {
        self.token = None;
        if let Some(path) = Self::credential_path() {
            let _ = fs::remove_file(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hydrate_missing_file_is_anonymous() {
        let tmp = TempDir::new().unwrap();
        let ctx = CredentialContext::hydrate_from(&tmp.path().join("credential.json"));
        assert!(ctx.token().is_none());
    }

    #[test]
    fn test_persist_then_hydrate_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("credential.json");
        CredentialContext::with_token("abc123").persist_to(&path);
        let ctx = CredentialContext::hydrate_from(&path);
        assert_eq!(ctx.token(), Some("abc123"));
    }

    #[test]
    fn test_hydrate_corrupt_file_is_anonymous() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("credential.json");
        fs::write(&path, "{not json").unwrap();
        assert!(CredentialContext::hydrate_from(&path).token().is_none());
    }
}
