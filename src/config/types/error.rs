//! Configuration error types.

use super::FieldPath;
use owo_colors::{OwoColorize, Stream};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a usable [`PeekConfig`](crate::config::PeekConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config is not valid TOML")]
    Toml(#[from] toml::de::Error),

    #[error("config `{0}` does not exist")]
    NotFound(PathBuf),

    // Displayed inline; a source() would repeat every diagnostic.
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

/// One rejected field value.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        match &self.hint {
            Some(hint) => write!(
                f,
                "\n    {} {hint}",
                "hint:".if_supports_color(Stream::Stderr, |t| t.yellow())
            ),
            None => Ok(()),
        }
    }
}

/// Problems found while validating every config section.
///
/// Sections push into one collector so a single run reports all of them.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, field: FieldPath, message: impl Into<String>) {
        self.push(field, message.into(), None);
    }

    pub fn error_with_hint(
        &mut self,
        field: FieldPath,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.push(field, message.into(), Some(hint.into()));
    }

    fn push(&mut self, field: FieldPath, message: String, hint: Option<String>) {
        self.errors.push(ConfigDiagnostic {
            field,
            message,
            hint,
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    /// `Ok` when nothing was reported.
    pub fn into_result(self) -> Result<(), Self> {
        if self.has_errors() { Err(self) } else { Ok(()) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.errors.len();
        let noun = if count == 1 { "problem" } else { "problems" };
        write!(
            f,
            "{}",
            format_args!("invalid configuration ({count} {noun})")
                .if_supports_color(Stream::Stderr, |t| t.red())
        )?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("rawpeek.toml"),
            Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(io_err.to_string(), "cannot read config `rawpeek.toml`");

        let missing = ConfigError::NotFound(PathBuf::from("other.toml"));
        assert!(missing.to_string().contains("other.toml"));
    }

    #[test]
    fn test_diagnostics_collect_all() {
        owo_colors::set_override(false);
        let mut diag = ConfigDiagnostics::new();
        diag.error(FieldPath::new("api.base"), "not a URL");
        diag.error_with_hint(FieldPath::new("preview.extensions"), "bad", "write `html`");
        assert_eq!(diag.len(), 2);

        let err = diag.into_result().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration (2 problems)\n  \
             - `api.base`: not a URL\n  \
             - `preview.extensions`: bad\n    hint: write `html`"
        );
    }

    #[test]
    fn test_single_problem_wording() {
        owo_colors::set_override(false);
        let mut diag = ConfigDiagnostics::new();
        diag.error(FieldPath::new("search.debounce_ms"), "must be positive");
        let display = diag.to_string();
        assert!(display.starts_with("invalid configuration (1 problem)"));
        assert!(!display.contains('\u{1b}'));
    }

    #[test]
    fn test_empty_diagnostics_ok() {
        assert!(ConfigDiagnostics::new().into_result().is_ok());
    }
}
