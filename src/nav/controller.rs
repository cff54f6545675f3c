//! Async navigator: runs transitions, executes their effects, publishes state.

use std::collections::VecDeque;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;

use super::transition::{self, Effect, Event};
use super::{NavError, NavOptions, NavigationState, query};
use crate::api::{ApiError, RepoApi};
use crate::cache::ContentCache;
use crate::core::{Coordinate, EntryKind, ListingEntry, RepoPath, base_directory};
use crate::pipeline::rewrite_document;
use crate::preview::{PreviewLease, PreviewSurface};

/// Rewritten document ready for a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    /// File name of the source document.
    pub name: String,
    /// Directory the document's references were resolved against.
    pub base: String,
    pub html: String,
}

/// Owner of the navigation state.
///
/// State lives in a `watch` channel and is only mutated synchronously inside
/// `send_modify`; no borrow is held across an await.
pub struct Navigator<A> {
    api: Arc<A>,
    cache: ContentCache,
    options: NavOptions,
    state: watch::Sender<NavigationState>,
}

impl<A: RepoApi> Navigator<A> {
    pub fn new(api: Arc<A>, options: NavOptions) -> Self {
        let (state, _) = watch::channel(NavigationState::default());
        Self {
            api,
            cache: ContentCache::new(),
            options,
            state,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> NavigationState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<NavigationState> {
        self.state.subscribe()
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn options(&self) -> &NavOptions {
        &self.options
    }

    // ========================================================================
    // operations
    // ========================================================================

    /// Load `owner/repo` at `branch` (blank = default branch) and list its root.
    pub async fn load_repository(&self, owner_repo: &str, branch: &str) -> Result<(), NavError> {
        let effects = self.dispatch(Event::LoadRepository {
            input: owner_repo.to_string(),
            branch: branch.to_string(),
        })?;
        self.run(effects).await
    }

    /// Navigate to `path` in the loaded repository. No-op when none is loaded.
    pub async fn open_path(&self, path: impl Into<RepoPath>) -> Result<(), NavError> {
        let effects = self.dispatch(Event::OpenPath(path.into()))?;
        self.run(effects).await
    }

    /// Open a directory, or select a previewable file.
    pub async fn select(&self, path: impl Into<RepoPath>, kind: EntryKind) -> Result<(), NavError> {
        let effects = self.dispatch(Event::Select {
            path: path.into(),
            kind,
        })?;
        self.run(effects).await
    }

    /// Restore a shared location. A query without `repo` is a no-op.
    pub async fn restore_location(&self, location: &str) -> Result<(), NavError> {
        let Some(location) = query::decode(location) else {
            crate::debug!("nav"; "no repository in {:?}", location);
            return Ok(());
        };

        let revision = location.revision.unwrap_or_default();
        self.load_repository(&location.repository, &revision).await?;
        if !location.path.is_root() {
            self.open_path(location.path).await?;
        }
        Ok(())
    }

    /// Fetch and rewrite the selected document.
    pub async fn preview_document(&self) -> Result<PreviewDocument, NavError> {
        self.dispatch(Event::PreviewRequested)?;
        let Some(coord) = self.state.borrow().preview_coordinate() else {
            return Err(NavError::Validation("no previewable file selected".into()));
        };

        let content = self
            .cache
            .files
            .get_or_fill(coord.clone(), || self.api.file_content(&coord))
            .await
            .map_err(|e| self.preview_failed(e.into()))?;

        let base = base_directory(&content.raw_location);
        let html = rewrite_document(&content.text, &base);
        crate::debug!("preview"; "rewrote {} against {}", coord, base);

        Ok(PreviewDocument {
            name: coord.path.file_name().unwrap_or("index.html").to_string(),
            base,
            html,
        })
    }

    /// Present the selected document on `surface` and schedule its release
    /// after the grace delay.
    pub async fn open_preview<S: PreviewSurface>(
        &self,
        surface: &S,
    ) -> Result<PreviewLease, NavError> {
        let document = self.preview_document().await?;
        let handle = surface
            .open(&document.html, &document.name)
            .map_err(|e| self.preview_failed(NavError::Surface(e.to_string())))?;

        Ok(PreviewLease::schedule(handle, self.options.grace))
    }

    // ========================================================================
    // effect execution
    // ========================================================================

    fn dispatch(&self, event: Event) -> Result<Vec<Effect>, NavError> {
        let mut outcome = Ok(Vec::new());
        self.state.send_modify(|state| {
            outcome = transition::apply(state, event, &self.options);
        });
        outcome
    }

    async fn run(&self, effects: Vec<Effect>) -> Result<(), NavError> {
        let mut queue = VecDeque::from(effects);
        while let Some(effect) = queue.pop_front() {
            let follow_up = self.execute(effect).await?;
            queue.extend(follow_up);
        }
        Ok(())
    }

    async fn execute(&self, effect: Effect) -> Result<Vec<Effect>, NavError> {
        match effect {
            Effect::FetchSnapshot { repository, branch } => {
                let fetched = self
                    .cache
                    .snapshots
                    .get_or_fill(repository.clone(), || self.api.repo_info(&repository))
                    .await;

                match fetched {
                    Ok(snapshot) => self.dispatch(Event::SnapshotLoaded {
                        repository,
                        branch,
                        snapshot,
                    }),
                    Err(e) => self.fail(Event::SnapshotFailed { message: e.to_string() }, e),
                }
            }
            Effect::FetchListing(coord) => {
                let fetched = self
                    .cache
                    .listings
                    .get_or_fill(coord.clone(), || async {
                        let entries = self.api.list_directory(&coord).await?;
                        Ok::<_, ApiError>(Arc::<[ListingEntry]>::from(entries))
                    })
                    .await;

                match fetched {
                    Ok(entries) => self.dispatch(Event::ListingLoaded { coord, entries }),
                    Err(e) => {
                        let message = e.to_string();
                        self.fail(Event::ListingFailed { coord, message }, e)
                    }
                }
            }
            Effect::FetchModified(coords) => {
                let dates = self.fetch_modified(&coords).await;
                self.dispatch(Event::ModifiedLoaded(dates))
            }
        }
    }

    /// One unordered lookup per coordinate; failures are logged and skipped.
    async fn fetch_modified(&self, coords: &[Coordinate]) -> Vec<(RepoPath, String)> {
        let lookups = coords.iter().map(|coord| async move {
            (coord, self.api.last_modified(coord).await)
        });

        join_all(lookups)
            .await
            .into_iter()
            .filter_map(|(coord, result)| match result {
                Ok(date) => Some((coord.path.clone(), date?)),
                Err(e) => {
                    crate::debug!("nav"; "last-modified for {} skipped: {}", coord, e);
                    None
                }
            })
            .collect()
    }

    /// Record a fetch failure in the state and return it as the error.
    fn fail(&self, event: Event, error: ApiError) -> Result<Vec<Effect>, NavError> {
        self.dispatch(event)?;
        Err(error.into())
    }

    fn preview_failed(&self, error: NavError) -> NavError {
        let message = error.to_string();
        // Recording a preview failure has no effects and cannot fail.
        let _ = self.dispatch(Event::PreviewFailed { message });
        error
    }
}
