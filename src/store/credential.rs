//! API token persistence.
//!
//! The store is a JSON object; the token lives under [`TOKEN_KEY`]. Other
//! keys in the file are preserved on write.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

/// Storage key of the API token.
pub const TOKEN_KEY: &str = "rawpeek.github-token";

/// JSON-backed single-token store.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored token, `None` when absent or blank.
    pub fn load(&self) -> io::Result<Option<String>> {
        let token = self
            .read()?
            .get(TOKEN_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(String::from);
        Ok(token)
    }

    /// Store `token`, replacing any previous one.
    pub fn save(&self, token: &str) -> io::Result<()> {
        let mut state = self.read()?;
        state.insert(TOKEN_KEY.into(), Value::String(token.trim().to_string()));
        self.write(&state)?;
        crate::debug!("store"; "saved token to {}", self.path.display());
        Ok(())
    }

    /// Remove the token. Returns whether one was stored.
    pub fn clear(&self) -> io::Result<bool> {
        let mut state = self.read()?;
        if state.remove(TOKEN_KEY).is_none() {
            return Ok(false);
        }
        self.write(&state)?;
        crate::debug!("store"; "removed token from {}", self.path.display());
        Ok(true)
    }

    fn read(&self) -> io::Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let json = fs::read_to_string(&self.path)?;
        if json.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write(&self, state: &Map<String, Value>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, json)?;
        restrict_permissions(&self.path)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
