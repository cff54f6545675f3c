//! `shell`: interactive browsing session over stdin.
//!
//! Every state change published by the navigator is rendered once after the
//! command that caused it. Errors and confirmations go through the status
//! line, which only ever shows the current message.

use std::io::Write;

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::ListingArgs;
use super::view;
use crate::api::RepoApi;
use crate::config::PeekConfig;
use crate::core::{ListingEntry, RepoPath};
use crate::logger::{status_detach, status_error, status_success};
use crate::nav::{NavError, NavigationState, Navigator};
use crate::preview::{PreviewLease, TempFileSurface};

const HELP: &str = "\
load <owner/repo> [ref]   load a repository
open <location>           restore a shared location
cd <dir|..|/>             change directory
up                        parent directory
select <name>             open a directory or select a document
preview                   open the selected document
filter [text]             filter entries (no text clears)
ls                        show the listing again
location                  print the shareable location
help                      this text
quit                      leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Load { repo: String, branch: String },
    Open(String),
    Cd(String),
    Up,
    Select(String),
    Preview,
    Filter(Option<String>),
    List,
    Location,
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let arg = || {
            Some(rest)
                .filter(|r| !r.is_empty())
                .map(String::from)
                .ok_or_else(|| format!("`{word}` needs an argument"))
        };

        Ok(match word {
            "" => Self::Empty,
            "load" | "l" => {
                let args = arg()?;
                let mut parts = args.split_whitespace();
                Self::Load {
                    repo: parts.next().unwrap_or_default().to_string(),
                    branch: parts.next().unwrap_or_default().to_string(),
                }
            }
            "open" | "o" => Self::Open(arg()?),
            "cd" => Self::Cd(arg()?),
            "up" | ".." => Self::Up,
            "select" | "s" => Self::Select(arg()?),
            "preview" | "p" => Self::Preview,
            "filter" | "f" => Self::Filter(arg().ok()),
            "ls" => Self::List,
            "location" | "loc" => Self::Location,
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => return Err(format!("unknown command `{other}` (try `help`)")),
        })
    }
}

/// Destination of `cd target` from `current`.
fn cd_target(current: &RepoPath, target: &str) -> RepoPath {
    match target.trim() {
        "/" => RepoPath::root(),
        ".." => current.parent().unwrap_or_default(),
        absolute if absolute.starts_with('/') => RepoPath::new(absolute),
        relative => current.join(relative),
    }
}

struct Session<'a, A> {
    nav: &'a Navigator<A>,
    surface: TempFileSurface,
    filter: Option<String>,
    /// Previews kept alive until their grace delay passes.
    leases: Vec<PreviewLease>,
}

/// Outcome of one command: an optional confirmation, or the navigation error.
type Step = Result<Option<String>, NavError>;

impl<A: RepoApi> Session<'_, A> {
    async fn execute(&mut self, command: ShellCommand) -> Step {
        let state = self.nav.state();
        match command {
            ShellCommand::Load { repo, branch } => {
                self.nav.load_repository(&repo, &branch).await?;
                Ok(None)
            }
            ShellCommand::Open(location) => {
                self.nav.restore_location(&location).await?;
                Ok(None)
            }
            ShellCommand::Cd(target) => {
                self.nav.open_path(cd_target(&state.path, &target)).await?;
                Ok(None)
            }
            ShellCommand::Up => {
                self.nav
                    .open_path(state.path.parent().unwrap_or_default())
                    .await?;
                Ok(None)
            }
            ShellCommand::Select(name) => {
                let Some(entry) = find_entry(&state, &name) else {
                    return Err(NavError::Validation(format!("no entry named `{name}`")));
                };
                let (path, kind) = (entry.path.clone(), entry.kind);
                self.nav.select(path, kind).await?;
                Ok(None)
            }
            ShellCommand::Preview => {
                self.leases.retain(|lease| !lease.is_released());
                let lease = self.nav.open_preview(&self.surface).await?;
                let message = format!("preview open for {}s", lease.grace().as_secs());
                self.leases.push(lease);
                Ok(Some(message))
            }
            ShellCommand::Filter(filter) => {
                self.filter = filter;
                view::print_listing(&state, self.filter.as_deref(), self.nav.options());
                status_detach();
                Ok(None)
            }
            ShellCommand::List => {
                view::print_listing(&state, self.filter.as_deref(), self.nav.options());
                status_detach();
                Ok(None)
            }
            ShellCommand::Location => Ok(Some(state.location)),
            ShellCommand::Help => {
                println!("{HELP}");
                status_detach();
                Ok(None)
            }
            ShellCommand::Quit | ShellCommand::Empty => Ok(None),
        }
    }
}

/// Entry of the current listing by name, or by full path.
fn find_entry<'a>(state: &'a NavigationState, name: &str) -> Option<&'a ListingEntry> {
    let name = name.trim().trim_end_matches('/');
    state
        .listing
        .iter()
        .find(|entry| entry.name == name)
        .or_else(|| state.listing.iter().find(|entry| entry.path == name))
}

fn prompt(state: &NavigationState) {
    let label = match &state.repository {
        Some(repository) => format!("{repository}:/{}", state.path),
        None => "rawpeek".to_string(),
    };
    print!("{}> ", label.if_supports_color(Stream::Stdout, |t| t.bright_blue()));
    std::io::stdout().flush().ok();
}

/// Run the interactive session, optionally loading `repo` first.
pub async fn run_shell<A: RepoApi>(
    nav: &Navigator<A>,
    config: &PeekConfig,
    repo: Option<&str>,
    listing: &ListingArgs,
) -> Result<()> {
    let mut session = Session {
        nav,
        surface: TempFileSurface::new(config.preview.opener.clone()),
        filter: listing.filter.clone(),
        leases: Vec::new(),
    };
    let mut changes = nav.subscribe();

    let mut pending = repo.map(|repo| ShellCommand::Load {
        repo: repo.to_string(),
        branch: listing.revision.clone().unwrap_or_default(),
    });
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let command = match pending.take() {
            Some(command) => Ok(command),
            None => {
                prompt(&nav.state());
                match lines.next_line().await? {
                    Some(line) => ShellCommand::parse(&line),
                    None => break,
                }
            }
        };

        let step = match command {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => session.execute(command).await,
            Err(message) => {
                status_error(&message, "");
                continue;
            }
        };

        if changes.has_changed()? {
            let state = changes.borrow_and_update().clone();
            status_detach();
            view::print_listing(&state, session.filter.as_deref(), nav.options());
        }
        match step {
            Ok(Some(message)) => status_success(&message),
            Ok(None) => {}
            Err(e) => status_error(&e.to_string(), ""),
        }
    }

    crate::debug!("shell"; "{} preview(s) still pending", session.leases.len());
    nav.cache().log_stats();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            ShellCommand::parse("load owner/repo dev"),
            Ok(ShellCommand::Load {
                repo: "owner/repo".into(),
                branch: "dev".into()
            })
        );
        assert_eq!(
            ShellCommand::parse("  l owner/repo "),
            Ok(ShellCommand::Load {
                repo: "owner/repo".into(),
                branch: String::new()
            })
        );
        assert_eq!(ShellCommand::parse("cd docs/api"), Ok(ShellCommand::Cd("docs/api".into())));
        assert_eq!(ShellCommand::parse("filter"), Ok(ShellCommand::Filter(None)));
        assert_eq!(
            ShellCommand::parse("f Read Me"),
            Ok(ShellCommand::Filter(Some("Read Me".into())))
        );
        assert_eq!(ShellCommand::parse(""), Ok(ShellCommand::Empty));
        assert_eq!(ShellCommand::parse("q"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!(ShellCommand::parse("load").is_err());
        assert!(ShellCommand::parse("select   ").is_err());
        assert!(ShellCommand::parse("frobnicate").is_err());
    }

    #[test]
    fn test_cd_target() {
        let current = RepoPath::new("docs/api");
        assert_eq!(cd_target(&current, "v1"), "docs/api/v1");
        assert_eq!(cd_target(&current, ".."), "docs");
        assert_eq!(cd_target(&current, "/"), "");
        assert_eq!(cd_target(&current, "/src/"), "src");
        assert_eq!(cd_target(&RepoPath::root(), ".."), "");
    }

    #[test]
    fn test_find_entry() {
        use crate::core::EntryKind;

        let state = NavigationState {
            listing: vec![
                ListingEntry::new("api", RepoPath::new("docs/api"), EntryKind::Dir),
                ListingEntry::new("index.html", RepoPath::new("docs/index.html"), EntryKind::File),
            ],
            ..NavigationState::default()
        };
        assert_eq!(find_entry(&state, "api/").map(|e| e.kind), Some(EntryKind::Dir));
        assert!(find_entry(&state, "docs/index.html").is_some());
        assert!(find_entry(&state, "missing").is_none());
    }
}
