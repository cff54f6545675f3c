//! Repository coordinates and the values fetched for them.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::RepoPath;

/// `owner/repo` identity. Case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub repo: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parse `owner/repo` input.
    ///
    /// Returns `None` unless at least two non-empty slash-separated segments
    /// are present. Extra segments are ignored.
    pub fn parse(input: &str) -> Option<Self> {
        let mut segments = input.trim().split('/').filter(|s| !s.is_empty());
        let owner = segments.next()?;
        let repo = segments.next()?;
        Some(Self::new(owner, repo))
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Branch, tag or commit name.
pub type Revision = String;

/// Repository metadata, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    pub default_branch: String,
    pub full_name: String,
}

/// Composite identity of one listing or file: `(repository, revision, path)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub repository: RepositoryRef,
    pub revision: Revision,
    pub path: RepoPath,
}

impl Coordinate {
    pub fn new(repository: RepositoryRef, revision: impl Into<Revision>, path: RepoPath) -> Self {
        Self {
            repository,
            revision: revision.into(),
            path,
        }
    }

    /// Same repository and revision, different path.
    pub fn with_path(&self, path: RepoPath) -> Self {
        Self {
            repository: self.repository.clone(),
            revision: self.revision.clone(),
            path,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.repository, self.revision, self.path)
    }
}

/// Kind of a listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

impl EntryKind {
    /// Map an API type string. Only `dir` is a directory; symlinks and
    /// submodules are presented as files.
    pub fn from_api(kind: &str) -> Self {
        if kind == "dir" { Self::Dir } else { Self::File }
    }

    #[inline]
    pub fn is_dir(self) -> bool {
        matches!(self, Self::Dir)
    }
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub name: String,
    /// Full path from the repository root; unique within one listing.
    pub path: RepoPath,
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Last-modified indicator, filled after the listing is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

impl ListingEntry {
    pub fn new(name: impl Into<String>, path: RepoPath, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            path,
            kind,
            download_url: None,
            modified: None,
        }
    }
}

/// Decoded text of one file and the absolute location it was served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub text: Arc<str>,
    pub raw_location: String,
}

/// Search result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub full_name: String,
}
