//! `[api]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [api]
//! base = "https://api.github.com"                 # REST API origin
//! raw_base = "https://raw.githubusercontent.com"  # Static-file origin
//! user_agent = "rawpeek"                          # User-Agent header
//! timeout_secs = 30                               # Per-request timeout
//! ```
//!
//! Point both origins at a GitHub Enterprise host to browse it instead.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Repository API client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base: String,
    pub raw_base: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base: "https://api.github.com".into(),
            raw_base: "https://raw.githubusercontent.com".into(),
            user_agent: concat!("rawpeek/", env!("CARGO_PKG_VERSION")).into(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (field, value) in [
            (FieldPath::new("api.base"), &self.base),
            (FieldPath::new("api.raw_base"), &self.raw_base),
        ] {
            if !is_http_origin(value) {
                diag.error_with_hint(
                    field,
                    format!("`{value}` is not an http(s) URL"),
                    "use a full origin such as \"https://api.github.com\"",
                );
            }
        }

        if self.user_agent.trim().is_empty() {
            diag.error(FieldPath::new("api.user_agent"), "must not be empty");
        }
        if self.timeout_secs == 0 {
            diag.error(FieldPath::new("api.timeout_secs"), "must be greater than 0");
        }
    }
}

fn is_http_origin(value: &str) -> bool {
    url::Url::parse(value)
        .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
}
