//! Configuration management for `rawpeek.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [api], [preview], [search], [listing], [auth]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # PeekConfig (this file)
//! ```
//!
//! The file is optional: without one every section takes its defaults.
//! An explicitly given `-C/--config` path must exist.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{ApiConfig, AuthConfig, ListingConfig, PreviewConfig, SearchConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::{Cli, Commands};
use crate::log;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "rawpeek.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing rawpeek.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeekConfig {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub listing: ListingConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

impl PeekConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file, applies CLI overrides
    /// and validates the result.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = path;
                config
            }
            None if cli.config != Path::new(CONFIG_FILE) => {
                return Err(ConfigError::NotFound(cli.config.clone()).into());
            }
            None => Self::default(),
        };

        config.auth.normalize();
        config.apply_command_options(cli);
        config.validate()?;

        crate::debug!("config"; "loaded {}", config.source_name());
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    fn source_name(&self) -> String {
        if self.config_path.as_os_str().is_empty() {
            "defaults (no config file)".to_string()
        } else {
            self.config_path.display().to_string()
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        if let Some(listing) = cli.listing_args() {
            Self::update_option(&mut self.listing.last_modified, listing.dates.as_ref());
        }
        if let Commands::Preview { grace, .. } = &cli.command {
            Self::update_option(&mut self.preview.grace_secs, grace.as_ref());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate every section, collecting all errors at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.api.validate(&mut diag);
        self.preview.validate(&mut diag);
        self.search.validate(&mut diag);
        self.auth.validate(&mut diag);

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config content.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PeekConfig {
    let (parsed, ignored) = PeekConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
