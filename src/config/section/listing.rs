//! `[listing]` section configuration.
//!
//! ```toml
//! [listing]
//! last_modified = true   # Fetch one commit date per entry after listing
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub last_modified: bool,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            last_modified: true,
        }
    }
}
