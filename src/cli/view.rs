//! Terminal rendering of navigation state.

use owo_colors::{OwoColorize, Stream, Style};

use crate::core::{ListingEntry, RepoPath};
use crate::nav::{NavOptions, NavigationState};

/// Label of the repository root in breadcrumbs.
const ROOT_LABEL: &str = "/";

/// Entries whose name contains `needle`, ASCII case-insensitively.
///
/// Applied after ordering, so the result keeps the listing order.
pub fn filter_entries<'a>(entries: &'a [ListingEntry], needle: Option<&str>) -> Vec<&'a ListingEntry> {
    let needle = needle.map(str::trim).unwrap_or_default().to_lowercase();
    entries
        .iter()
        .filter(|entry| needle.is_empty() || entry.name.to_lowercase().contains(&needle))
        .collect()
}

/// `(label, path)` pairs from the root down to `path`.
pub fn breadcrumbs(path: &RepoPath) -> Vec<(String, RepoPath)> {
    let mut crumbs = vec![(ROOT_LABEL.to_string(), RepoPath::root())];
    let mut current = RepoPath::root();
    for segment in path.segments() {
        current = current.join(segment);
        crumbs.push((segment.to_string(), current.clone()));
    }
    crumbs
}

/// One terminal row for `entry`.
pub fn render_row(entry: &ListingEntry, options: &NavOptions) -> String {
    let name = if entry.kind.is_dir() {
        format!("{}/", entry.name)
            .if_supports_color(Stream::Stdout, |t| t.style(Style::new().bright_blue().bold()))
            .to_string()
    } else if options.is_previewable(entry.path.extension()) {
        entry
            .name
            .if_supports_color(Stream::Stdout, |t| t.bright_green())
            .to_string()
    } else {
        entry.name.clone()
    };

    match &entry.modified {
        Some(date) => format!(
            "  {name}  {}",
            date.if_supports_color(Stream::Stdout, |t| t.dimmed())
        ),
        None => format!("  {name}"),
    }
}

/// Header line: `owner/repo@revision  / › docs › api`.
pub fn render_header(state: &NavigationState) -> Option<String> {
    let repository = state.repository.as_ref()?;
    let trail = breadcrumbs(&state.path)
        .into_iter()
        .map(|(label, _)| label)
        .collect::<Vec<_>>()
        .join(" › ");
    Some(format!(
        "{}@{}  {}",
        repository.if_supports_color(Stream::Stdout, |t| t.bold()),
        state.revision.if_supports_color(Stream::Stdout, |t| t.cyan()),
        trail
    ))
}

/// Print the header and the (filtered) listing of `state`.
pub fn print_listing(state: &NavigationState, filter: Option<&str>, options: &NavOptions) {
    if let Some(header) = render_header(state) {
        println!("{header}");
    }

    let entries = filter_entries(&state.listing, filter);
    for entry in &entries {
        println!("{}", render_row(entry, options));
    }
    if entries.is_empty() && state.error.is_none() {
        println!("  {}", "(empty)".if_supports_color(Stream::Stdout, |t| t.dimmed()));
    }
    if let Some(preview) = &state.preview_path {
        println!(
            "{} {}",
            "preview:".if_supports_color(Stream::Stdout, |t| t.bright_green()),
            preview
        );
    }
}
