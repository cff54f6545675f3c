//! Navigation state.

use crate::core::{Coordinate, ListingEntry, RepoPath, RepositoryRef, RepositorySnapshot, Revision};

use super::query;

/// Coarse lifecycle of the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No repository loaded.
    #[default]
    Idle,
    LoadingRepo,
    Browsing,
    /// Transient; re-entered on every path change.
    LoadingPath,
}

/// Single source of truth for what is rendered.
///
/// Only `nav::transition` mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub repository: Option<RepositoryRef>,
    pub snapshot: Option<RepositorySnapshot>,
    pub revision: Revision,
    pub path: RepoPath,
    /// Ordered entries of the last completed listing fetch.
    pub listing: Vec<ListingEntry>,
    /// Selected previewable file.
    pub preview_path: Option<RepoPath>,
    /// A repository has been loaded at least once.
    pub loaded: bool,
    pub phase: Phase,
    /// The single current user-visible error.
    pub error: Option<String>,
    /// Shareable query string mirroring repository, revision and path.
    pub location: String,
}

impl NavigationState {
    /// Coordinate of the current directory.
    pub fn coordinate(&self) -> Option<Coordinate> {
        let repository = self.repository.clone()?;
        Some(Coordinate::new(
            repository,
            self.revision.clone(),
            self.path.clone(),
        ))
    }

    /// Coordinate of the selected previewable file.
    pub fn preview_coordinate(&self) -> Option<Coordinate> {
        let path = self.preview_path.clone()?;
        Some(self.coordinate()?.with_path(path))
    }

    /// Rewrite `location` from repository, revision and path.
    pub(super) fn sync_location(&mut self) {
        self.location = match &self.repository {
            Some(repository) => query::encode(repository, &self.revision, &self.path),
            None => String::new(),
        };
    }
}
