//! `preview`: render one document and open it.

use std::path::Path;

use anyhow::Result;

use crate::api::RepoApi;
use crate::config::PeekConfig;
use crate::core::EntryKind;
use crate::nav::Navigator;
use crate::preview::{TempFileSurface, WriteSurface};

/// Rewrite `path` of `repo` and open it (or write it to `output`).
///
/// When opened, waits for the grace delay so the temporary document
/// outlives the viewer's initial load.
pub async fn run_preview<A: RepoApi>(
    nav: &Navigator<A>,
    config: &PeekConfig,
    repo: &str,
    path: &str,
    revision: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    nav.load_repository(repo, revision.unwrap_or_default()).await?;
    nav.select(path, EntryKind::File).await?;

    match output {
        Some(output) => {
            nav.open_preview(&WriteSurface::new(output)).await?;
        }
        None => {
            let surface = TempFileSurface::new(config.preview.opener.clone());
            let lease = nav.open_preview(&surface).await?;
            crate::log!(
                "preview"; "keeping the document for {}s",
                lease.grace().as_secs()
            );
            lease.released().await;
        }
    }

    nav.cache().log_stats();
    Ok(())
}
