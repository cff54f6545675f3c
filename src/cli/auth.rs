//! `login` and `logout`: manage the stored API token.

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::common::credential_store;
use crate::config::PeekConfig;

/// Store `token`, or the first line of stdin when omitted.
pub async fn run_login(config: &PeekConfig, token: Option<&str>) -> Result<()> {
    let token = match token {
        Some(token) => token.trim().to_string(),
        None => {
            let mut line = String::new();
            BufReader::new(tokio::io::stdin())
                .read_line(&mut line)
                .await
                .context("failed to read token from stdin")?;
            line.trim().to_string()
        }
    };
    if token.is_empty() {
        bail!("empty token");
    }

    let store = credential_store(config);
    store
        .save(&token)
        .with_context(|| format!("failed to write {}", store.path().display()))?;
    crate::log!("auth"; "token saved to {}", store.path().display());
    Ok(())
}

/// Remove the stored token.
pub fn run_logout(config: &PeekConfig) -> Result<()> {
    let store = credential_store(config);
    let removed = store
        .clear()
        .with_context(|| format!("failed to update {}", store.path().display()))?;

    if removed {
        crate::log!("auth"; "token removed from {}", store.path().display());
    } else {
        crate::log!("auth"; "no token stored");
    }
    Ok(())
}
