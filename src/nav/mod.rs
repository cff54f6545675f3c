//! Navigation controller.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  Event   ┌──────────────────┐  Effect  ┌──────────────┐
//! │  Navigator   │ ───────▶ │ transition::apply│ ───────▶ │ ContentCache │
//! │ (async, owns │ ◀─────── │  (pure, sync)    │          │  + RepoApi   │
//! │ watch chan)  │  state   └──────────────────┘          └──────────────┘
//! └──────────────┘
//!        │ watch::Receiver<NavigationState>
//!        ▼
//!   presentation
//! ```
//!
//! The navigator is the only writer of [`NavigationState`]; every change is
//! published to subscribers.

mod controller;
pub mod query;
mod state;
pub mod transition;


pub use controller::{Navigator, PreviewDocument};
pub use state::{NavigationState, Phase};
pub use transition::{Effect, Event};

use std::time::Duration;

use thiserror::Error;

use crate::api::ApiError;
use crate::config::PeekConfig;

/// Navigation failure; its message is also the state's current error.
#[derive(Debug, Error)]
pub enum NavError {
    /// Malformed user input.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("preview failed: {0}")]
    Surface(String),
}

/// Behavior knobs taken from configuration.
#[derive(Debug, Clone)]
pub struct NavOptions {
    /// Previewable extensions, compared ASCII case-insensitively.
    pub previewable: Vec<String>,
    /// Fetch last-modified dates after each listing.
    pub last_modified: bool,
    /// Delay before a preview resource is released.
    pub grace: Duration,
}

impl NavOptions {
    pub fn from_config(config: &PeekConfig) -> Self {
        Self {
            previewable: config.preview.extensions.clone(),
            last_modified: config.listing.last_modified,
            grace: Duration::from_secs(config.preview.grace_secs),
        }
    }

    pub fn is_previewable(&self, extension: Option<&str>) -> bool {
        extension.is_some_and(|ext| {
            self.previewable
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
    }
}

impl Default for NavOptions {
    fn default() -> Self {
        Self::from_config(&PeekConfig::default())
    }
}
