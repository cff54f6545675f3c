//! rawpeek - browse a remote repository and preview its HTML documents.

mod api;
mod cache;
mod cli;
mod config;
mod core;
mod logger;
mod nav;
mod pipeline;
mod preview;
mod search;
mod store;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, common};
use config::PeekConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = PeekConfig::load(&cli)?;

    // All navigation runs on one thread; fetches interleave at await points.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(&cli, &config))
}

async fn run(cli: &Cli, config: &PeekConfig) -> Result<()> {
    match &cli.command {
        Commands::Browse {
            repo,
            path,
            listing,
        } => {
            let nav = common::navigator(cli, config)?;
            cli::browse::run_browse(&nav, repo, path.as_deref(), listing).await
        }
        Commands::Open { location, listing } => {
            let nav = common::navigator(cli, config)?;
            cli::browse::run_open(&nav, location, listing).await
        }
        Commands::Preview {
            repo,
            path,
            revision,
            output,
            ..
        } => {
            let nav = common::navigator(cli, config)?;
            cli::preview::run_preview(
                &nav,
                config,
                repo,
                path,
                revision.as_deref(),
                output.as_deref(),
            )
            .await
        }
        Commands::Search { query, follow } => {
            let api = common::connect(cli, config)?;
            cli::search::run_search(api, config, query.as_deref(), *follow).await
        }
        Commands::Login { token } => cli::auth::run_login(config, token.as_deref()).await,
        Commands::Logout => cli::auth::run_logout(config),
        Commands::Shell { repo, listing } => {
            let nav = common::navigator(cli, config)?;
            cli::shell::run_shell(&nav, config, repo.as_deref(), listing).await
        }
    }
}
