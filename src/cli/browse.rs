//! `browse` and `open`: print one directory listing.

use anyhow::Result;

use super::ListingArgs;
use super::view;
use crate::api::RepoApi;
use crate::nav::{Navigator, query};

/// List `path` (default: root) of `repo`.
pub async fn run_browse<A: RepoApi>(
    nav: &Navigator<A>,
    repo: &str,
    path: Option<&str>,
    listing: &ListingArgs,
) -> Result<()> {
    let revision = listing.revision.as_deref().unwrap_or_default();
    nav.load_repository(repo, revision).await?;
    if let Some(path) = path {
        nav.open_path(path).await?;
    }

    print(nav, listing);
    Ok(())
}

/// List the directory a shared location points at.
///
/// `--ref` replaces the location's revision.
pub async fn run_open<A: RepoApi>(
    nav: &Navigator<A>,
    location: &str,
    listing: &ListingArgs,
) -> Result<()> {
    match (&listing.revision, query::decode(location)) {
        (Some(revision), Some(decoded)) => {
            nav.load_repository(&decoded.repository, revision).await?;
            if !decoded.path.is_root() {
                nav.open_path(decoded.path).await?;
            }
        }
        _ => nav.restore_location(location).await?,
    }

    if nav.state().repository.is_none() {
        crate::log!("open"; "no repository in `{}`, nothing to show", location);
        return Ok(());
    }

    print(nav, listing);
    Ok(())
}

fn print<A: RepoApi>(nav: &Navigator<A>, listing: &ListingArgs) {
    view::print_listing(&nav.state(), listing.filter.as_deref(), nav.options());
    crate::debug!("browse"; "location: {}", nav.state().location);
    nav.cache().log_stats();
}
