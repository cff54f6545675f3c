//! `[auth]` section configuration.
//!
//! ```toml
//! [auth]
//! store = "~/.config/rawpeek/state.json"   # Credential store file
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub store: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            store: PathBuf::from("~/.config/rawpeek/state.json"),
        }
    }
}

impl AuthConfig {
    /// Expand `~` in the store path.
    pub fn normalize(&mut self) {
        self.store = expand_tilde(&self.store);
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.store.as_os_str().is_empty() {
            diag.error(FieldPath::new("auth.store"), "must not be empty");
        } else if self.store.is_dir() {
            diag.error_with_hint(
                FieldPath::new("auth.store"),
                format!("`{}` is a directory", self.store.display()),
                "point it at a file such as state.json",
            );
        }
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}
