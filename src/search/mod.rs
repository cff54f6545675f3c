//! Repository search.
//!
//! [`RepoSearch`] runs one lookup; [`SearchDebouncer`] decides when a query
//! being edited has settled enough to be worth a lookup.

mod debouncer;

pub use debouncer::{DEBOUNCE_MS, SearchDebouncer};

use std::sync::Arc;

use crate::api::{RepoApi, Result};
use crate::core::RepoSummary;

/// Repository lookup by user or organization name.
pub struct RepoSearch<A> {
    api: Arc<A>,
}

impl<A: RepoApi> RepoSearch<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Repositories of `query`; an empty query yields nothing.
    pub async fn search(&self, query: &str) -> Result<Vec<RepoSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let results = self.api.search_repos(query).await?;
        crate::debug!("search"; "{} repositories for {}", results.len(), query);
        Ok(results)
    }
}
