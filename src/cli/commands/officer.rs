//! Officer account bootstrap

use std::path::Path;

use anyhow::bail;

use idir::core::models::{Officer, Role};
use idir::core::ports::OfficerRepository;
use idir::core::services::FieldErrors;
use idir::output::{BootstrapResult, OutputMode};

use super::{load_config, open_store};

/// Create a super-admin account directly in the store.
///
/// Runs without a token so the very first officer can be created. An
/// existing account with the same username is left untouched.
pub fn officer_bootstrap(
    config: Option<&Path>,
    username: &str,
    name: &str,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let mut errors = FieldErrors::new();
    let username = errors.username("username", username);
    let name = errors.required_text("name", name);
    if !errors.is_empty() {
        bail!("{errors}");
    }

    let config = load_config(config)?;
    let store = open_store(&config)?;

    let created = if store.get(&username)?.is_some() {
        false
    } else {
        let officer = Officer::new(&username, &name, [Role::SuperAdmin].into_iter().collect());
        store.create(&officer)?;
        log::info!("Bootstrapped super-admin {username}");
        true
    };

    BootstrapResult {
        username,
        created,
        data_dir: store.root().display().to_string(),
    }
    .render(mode);
    Ok(())
}
