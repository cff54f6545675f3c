//! `[preview]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [preview]
//! grace_secs = 60                # Delete the temporary document after this delay
//! extensions = ["html", "htm"]   # Previewable file extensions
//! opener = "firefox"             # Program used to open documents (default: platform opener)
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Document surface settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub grace_secs: u64,
    pub extensions: Vec<String>,
    pub opener: Option<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            grace_secs: 60,
            extensions: vec!["html".into(), "htm".into()],
            opener: None,
        }
    }
}

impl PreviewConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let field = FieldPath::new("preview.extensions");
        if self.extensions.is_empty() {
            diag.error(field, "at least one extension is required");
        }
        for ext in &self.extensions {
            if ext.starts_with('.') || ext.contains('/') || ext.trim().is_empty() {
                diag.error_with_hint(
                    field,
                    format!("invalid extension `{ext}`"),
                    "write `html`, not `.html`",
                );
            }
        }

        if let Some(opener) = &self.opener
            && opener.trim().is_empty()
        {
            diag.error(FieldPath::new("preview.opener"), "must not be empty when set");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_preview_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.preview.grace_secs, 60);
        assert_eq!(config.preview.extensions, ["html", "htm"]);
        assert!(config.preview.opener.is_none());
    }

    #[test]
    fn test_custom_extensions() {
        let config = test_parse_config("[preview]\nextensions = [\"xhtml\"]\nopener = \"firefox\"");
        assert_eq!(config.preview.extensions, ["xhtml"]);
        assert_eq!(config.preview.opener.as_deref(), Some("firefox"));
    }

    #[test]
    fn test_dotted_extension_rejected() {
        let config = test_parse_config("[preview]\nextensions = [\".html\"]");
        let mut diag = ConfigDiagnostics::new();
        config.preview.validate(&mut diag);
        assert!(diag.has_errors());
        assert!(diag.errors()[0].hint.is_some());
    }
}
