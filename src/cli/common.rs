//! Setup shared by commands that talk to the repository API.

use std::sync::Arc;

use anyhow::{Context, Result};

use super::Cli;
use crate::api::GithubApi;
use crate::config::PeekConfig;
use crate::nav::{NavOptions, Navigator};
use crate::store::CredentialStore;

/// Credential store at the configured location.
pub fn credential_store(config: &PeekConfig) -> CredentialStore {
    CredentialStore::new(&config.auth.store)
}

/// Token for this invocation: `--token`, else the stored one.
pub fn resolve_token(cli: &Cli, config: &PeekConfig) -> Result<Option<String>> {
    if let Some(token) = cli.token.as_deref().map(str::trim)
        && !token.is_empty()
    {
        crate::debug!("auth"; "using --token");
        return Ok(Some(token.to_string()));
    }

    let store = credential_store(config);
    let token = store
        .load()
        .with_context(|| format!("failed to read {}", store.path().display()))?;
    if token.is_some() {
        crate::debug!("auth"; "using token from {}", store.path().display());
    }
    Ok(token)
}

/// API client for this invocation.
pub fn connect(cli: &Cli, config: &PeekConfig) -> Result<Arc<GithubApi>> {
    let token = resolve_token(cli, config)?;
    let api = GithubApi::new(&config.api, token).context("failed to create API client")?;
    Ok(Arc::new(api))
}

/// Navigator over a fresh API client.
pub fn navigator(cli: &Cli, config: &PeekConfig) -> Result<Navigator<GithubApi>> {
    Ok(Navigator::new(
        connect(cli, config)?,
        NavOptions::from_config(config),
    ))
}
