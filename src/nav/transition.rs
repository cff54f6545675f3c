//! Pure navigation transitions.
//!
//! `apply(state, event, options)` mutates the state and returns the fetches
//! the navigator must run next. Fetch results come back as events.
//!
//! ```text
//! Idle ──LoadRepository──▶ LoadingRepo ──SnapshotLoaded──▶ LoadingPath
//!                               │                              │
//!                        SnapshotFailed                 ListingLoaded/Failed
//!                               ▼                              ▼
//!                      Idle (or Browsing) ◀───────────── Browsing ──OpenPath──▶ LoadingPath
//! ```

use std::cmp::Ordering;
use std::sync::Arc;

use crate::core::{
    Coordinate, EntryKind, ListingEntry, RepoPath, RepositoryRef, RepositorySnapshot, Revision,
};

use super::{NavError, NavOptions, NavigationState, Phase};

/// Input to a transition.
#[derive(Debug, Clone)]
pub enum Event {
    /// User asked for `owner/repo`, optionally at `branch` (blank = default).
    LoadRepository { input: String, branch: String },
    SnapshotLoaded {
        repository: RepositoryRef,
        branch: Option<Revision>,
        snapshot: RepositorySnapshot,
    },
    SnapshotFailed { message: String },
    OpenPath(RepoPath),
    ListingLoaded {
        coord: Coordinate,
        entries: Arc<[ListingEntry]>,
    },
    ListingFailed { coord: Coordinate, message: String },
    /// Last-modified dates by entry path.
    ModifiedLoaded(Vec<(RepoPath, String)>),
    Select { path: RepoPath, kind: EntryKind },
    PreviewRequested,
    PreviewFailed { message: String },
}

/// Side-effecting work requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchSnapshot {
        repository: RepositoryRef,
        branch: Option<Revision>,
    },
    FetchListing(Coordinate),
    /// One lookup per coordinate; unordered, failures skipped.
    FetchModified(Vec<Coordinate>),
}

pub type Outcome = Result<Vec<Effect>, NavError>;

/// Apply one event.
///
/// Validation failures are also recorded in `state.error`.
pub fn apply(state: &mut NavigationState, event: Event, options: &NavOptions) -> Outcome {
    match event {
        Event::LoadRepository { input, branch } => load_repository(state, &input, &branch),
        Event::SnapshotLoaded {
            repository,
            branch,
            snapshot,
        } => Ok(snapshot_loaded(state, repository, branch, snapshot)),
        Event::SnapshotFailed { message } => {
            state.phase = if state.loaded {
                Phase::Browsing
            } else {
                Phase::Idle
            };
            state.error = Some(message);
            Ok(Vec::new())
        }
        Event::OpenPath(path) => Ok(open_path(state, path)),
        Event::ListingLoaded { coord, entries } => Ok(listing_loaded(state, coord, &entries, options)),
        Event::ListingFailed { coord, message } => {
            crate::debug!("nav"; "listing {} failed", coord);
            state.listing = Vec::new();
            state.phase = Phase::Browsing;
            state.error = Some(message);
            Ok(Vec::new())
        }
        Event::ModifiedLoaded(dates) => {
            for (path, date) in dates {
                if let Some(entry) = state.listing.iter_mut().find(|e| e.path == path) {
                    entry.modified = Some(date);
                }
            }
            Ok(Vec::new())
        }
        Event::Select { path, kind } => select(state, path, kind, options),
        Event::PreviewRequested => {
            state.error = None;
            if state.preview_coordinate().is_none() {
                return Err(invalid(state, "no previewable file selected".into()));
            }
            Ok(Vec::new())
        }
        Event::PreviewFailed { message } => {
            state.error = Some(message);
            Ok(Vec::new())
        }
    }
}

fn load_repository(state: &mut NavigationState, input: &str, branch: &str) -> Outcome {
    state.error = None;

    let Some(repository) = RepositoryRef::parse(input) else {
        return Err(invalid(
            state,
            format!("expected `owner/repo`, got `{}`", input.trim()),
        ));
    };

    let branch = Some(branch.trim())
        .filter(|b| !b.is_empty())
        .map(String::from);
    state.phase = Phase::LoadingRepo;

    Ok(vec![Effect::FetchSnapshot { repository, branch }])
}

fn snapshot_loaded(
    state: &mut NavigationState,
    repository: RepositoryRef,
    branch: Option<Revision>,
    snapshot: RepositorySnapshot,
) -> Vec<Effect> {
    let revision = branch.unwrap_or_else(|| snapshot.default_branch.clone());

    *state = NavigationState {
        repository: Some(repository),
        snapshot: Some(snapshot),
        revision,
        loaded: true,
        phase: Phase::LoadingPath,
        ..NavigationState::default()
    };
    state.sync_location();

    state
        .coordinate()
        .map(Effect::FetchListing)
        .into_iter()
        .collect()
}

fn open_path(state: &mut NavigationState, path: RepoPath) -> Vec<Effect> {
    if state.repository.is_none() {
        return Vec::new();
    }

    state.error = None;
    state.preview_path = None;
    state.path = path;
    state.phase = Phase::LoadingPath;
    state.sync_location();

    state
        .coordinate()
        .map(Effect::FetchListing)
        .into_iter()
        .collect()
}

/// Results are applied whichever navigation they belong to: the last
/// completed fetch owns the listing.
fn listing_loaded(
    state: &mut NavigationState,
    coord: Coordinate,
    entries: &[ListingEntry],
    options: &NavOptions,
) -> Vec<Effect> {
    state.listing = order_listing(entries);
    state.phase = Phase::Browsing;
    crate::debug!("nav"; "{} entries at {}", state.listing.len(), coord);

    if !options.last_modified || state.listing.is_empty() {
        return Vec::new();
    }
    let coords = state
        .listing
        .iter()
        .map(|entry| coord.with_path(entry.path.clone()))
        .collect();
    vec![Effect::FetchModified(coords)]
}

fn select(
    state: &mut NavigationState,
    path: RepoPath,
    kind: EntryKind,
    options: &NavOptions,
) -> Outcome {
    if kind.is_dir() {
        return Ok(open_path(state, path));
    }

    state.error = None;
    if !options.is_previewable(path.extension()) {
        return Err(invalid(
            state,
            format!("`{path}` is not a previewable document"),
        ));
    }

    state.preview_path = Some(path);
    Ok(Vec::new())
}

fn invalid(state: &mut NavigationState, message: String) -> NavError {
    state.error = Some(message.clone());
    NavError::Validation(message)
}

/// Directories first, then files; each by lower-cased name, ties by raw name.
pub fn order_listing(entries: &[ListingEntry]) -> Vec<ListingEntry> {
    let mut ordered = entries.to_vec();
    ordered.sort_by(|a, b| {
        b.kind
            .is_dir()
            .cmp(&a.kind.is_dir())
            .then_with(|| compare_names(&a.name, &b.name))
    });
    ordered
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
