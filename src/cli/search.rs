//! `search`: list repositories of a user or organization.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use owo_colors::{OwoColorize, Stream};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::RepoApi;
use crate::config::PeekConfig;
use crate::core::RepoSummary;
use crate::search::{RepoSearch, SearchDebouncer};

/// Search `query`, then (with `follow`) keep searching settled edits read
/// from stdin, one query per line.
pub async fn run_search<A: RepoApi>(
    api: Arc<A>,
    config: &PeekConfig,
    query: Option<&str>,
    follow: bool,
) -> Result<()> {
    let search = RepoSearch::new(api);

    if let Some(query) = query {
        print_results(query, &search.search(query).await?);
    }
    if !follow {
        if query.is_none() {
            bail!("nothing to search: pass a user or organization name, or --follow");
        }
        return Ok(());
    }

    let mut debouncer = SearchDebouncer::new(Duration::from_millis(config.search.debounce_ms));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => debouncer.push(&line),
                None => break,
            },
            () = tokio::time::sleep(debouncer.sleep_duration()) => {}
        }

        if let Some(query) = debouncer.take_if_ready() {
            run_one(&search, &query).await;
        }
    }

    if let Some(query) = debouncer.flush() {
        run_one(&search, &query).await;
    }
    Ok(())
}

/// One follow-mode lookup; a failure is reported and the loop goes on.
async fn run_one<A: RepoApi>(search: &RepoSearch<A>, query: &str) {
    match search.search(query).await {
        Ok(results) => print_results(query, &results),
        Err(e) => crate::log!("error"; "{}: {}", query, e),
    }
}

fn print_results(query: &str, results: &[RepoSummary]) {
    if query.trim().is_empty() {
        return;
    }
    crate::log!("search"; "{} ({})", query.trim().if_supports_color(Stream::Stdout, |t| t.bold()), results.len());
    for repo in results {
        println!("  {}", repo.full_name);
    }
}
