//! Token issuance

use std::path::Path;

use anyhow::bail;
use chrono::Utc;

use idir::auth::TokenSigner;
use idir::core::ports::OfficerRepository;
use idir::output::{OutputMode, TokenResult};

use super::{load_config, open_store};

/// Mint a bearer token for an existing, active officer
pub fn token_issue(config: Option<&Path>, username: &str, mode: OutputMode) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let signer = TokenSigner::new(config.token_secret()?, config.token_ttl())?;
    let store = open_store(&config)?;

    let Some(officer) = store.get(username)? else {
        bail!("officer '{username}' not found");
    };
    if !officer.active {
        bail!("officer '{username}' is deactivated");
    }

    let now = Utc::now();
    TokenResult {
        username: officer.username.clone(),
        token: signer.issue(&officer, now),
        expires_at: (now + signer.ttl()).to_rfc3339(),
    }
    .render(mode);
    Ok(())
}
