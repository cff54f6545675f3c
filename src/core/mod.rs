//! Core types - pure abstractions shared across the codebase.

mod coord;
mod link;
mod path;
mod url;

pub use coord::{
    Coordinate, EntryKind, FileContent, ListingEntry, RepoSummary, RepositoryRef,
    RepositorySnapshot, Revision,
};
pub use link::{RefKind, is_untouched};
pub use path::RepoPath;
pub use url::{base_directory, resolve_reference};
