//! Repository-hosting API.
//!
//! [`RepoApi`] is the capability the navigation core consumes; [`GithubApi`]
//! implements it over the GitHub REST v3 endpoints.

mod error;
mod github;

pub use error::{ApiError, Result};
pub use github::GithubApi;

use std::future::Future;

use crate::core::{Coordinate, FileContent, ListingEntry, RepoSummary, RepositoryRef, RepositorySnapshot};

/// Remote operations used by the navigator and search.
///
/// All operations are asynchronous and independent; callers may run several
/// at once.
pub trait RepoApi: Send + Sync {
    /// Repository metadata (`default_branch`, `full_name`).
    fn repo_info(
        &self,
        repo: &RepositoryRef,
    ) -> impl Future<Output = Result<RepositorySnapshot>> + Send;

    /// Entries of the directory at `coord`, in API order.
    fn list_directory(
        &self,
        coord: &Coordinate,
    ) -> impl Future<Output = Result<Vec<ListingEntry>>> + Send;

    /// Decoded text of the file at `coord` and its raw location.
    fn file_content(&self, coord: &Coordinate) -> impl Future<Output = Result<FileContent>> + Send;

    /// Date of the latest commit touching `coord`, if any.
    fn last_modified(
        &self,
        coord: &Coordinate,
    ) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Repositories owned by the user or organization named `query`.
    fn search_repos(&self, query: &str) -> impl Future<Output = Result<Vec<RepoSummary>>> + Send;
}
