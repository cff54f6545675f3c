//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Browse remote repositories and preview their HTML documents
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: rawpeek.toml, searched upward)
    #[arg(short = 'C', long, global = true, default_value = "rawpeek.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// API token for this invocation (overrides the stored one)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List a directory of a repository
    #[command(visible_alias = "b")]
    Browse {
        /// Repository as `owner/repo`
        repo: String,

        /// Directory path inside the repository (default: root)
        path: Option<String>,

        #[command(flatten)]
        listing: ListingArgs,
    },

    /// Restore a shared location (`?repo=owner/name&ref=main&path=docs`)
    #[command(visible_alias = "o")]
    Open {
        /// Query string or full URL carrying `repo`, `ref` and `path`
        location: String,

        #[command(flatten)]
        listing: ListingArgs,
    },

    /// Render an HTML document from a repository
    #[command(visible_alias = "p")]
    Preview {
        /// Repository as `owner/repo`
        repo: String,

        /// Path of the document inside the repository
        path: String,

        /// Branch, tag or commit (default: the repository's default branch)
        #[arg(short, long = "ref")]
        revision: Option<String>,

        /// Write the rewritten document to this file instead of opening it
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Seconds before the temporary document is deleted
        #[arg(short, long)]
        grace: Option<u64>,
    },

    /// List repositories of a user or organization
    #[command(visible_alias = "s")]
    Search {
        /// User or organization name
        query: Option<String>,

        /// Read query edits from stdin, one per line, and search settled ones
        #[arg(short, long)]
        follow: bool,
    },

    /// Store an API token (read from stdin when omitted)
    Login {
        /// Token value
        token: Option<String>,
    },

    /// Remove the stored API token
    Logout,

    /// Interactive browsing session
    Shell {
        /// Repository to load on start, as `owner/repo`
        repo: Option<String>,

        #[command(flatten)]
        listing: ListingArgs,
    },
}

/// Shared listing arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ListingArgs {
    /// Branch, tag or commit (default: the repository's default branch)
    #[arg(short, long = "ref")]
    pub revision: Option<String>,

    /// Fetch last-modified dates for listed entries
    #[arg(short = 'D', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub dates: Option<bool>,

    /// Only show entries whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,
}

impl Cli {
    /// Listing arguments of the current command, if any.
    pub fn listing_args(&self) -> Option<&ListingArgs> {
        match &self.command {
            Commands::Browse { listing, .. }
            | Commands::Open { listing, .. }
            | Commands::Shell { listing, .. } => Some(listing),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag_kept() {
        let err = Cli::try_parse_from(["rawpeek", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_parse_browse() {
        let cli = Cli::parse_from(["rawpeek", "browse", "o/r", "docs", "--ref", "dev", "-D"]);
        let Commands::Browse { repo, path, listing } = &cli.command else {
            panic!("expected browse");
        };
        assert_eq!(repo, "o/r");
        assert_eq!(path.as_deref(), Some("docs"));
        assert_eq!(listing.revision.as_deref(), Some("dev"));
        assert_eq!(listing.dates, Some(true));
        assert!(cli.listing_args().is_some());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["rawpeek", "search", "octocat", "-v", "--token", "t"]);
        assert!(cli.verbose);
        assert_eq!(cli.token.as_deref(), Some("t"));
        assert!(cli.listing_args().is_none());
    }

    #[test]
    fn test_parse_preview_output() {
        let cli = Cli::parse_from(["rawpeek", "p", "o/r", "index.html", "-o", "out.html"]);
        let Commands::Preview { output, grace, .. } = &cli.command else {
            panic!("expected preview");
        };
        assert_eq!(output.as_deref(), Some(std::path::Path::new("out.html")));
        assert_eq!(*grace, None);
    }
}
