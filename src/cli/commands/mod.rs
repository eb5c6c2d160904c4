//! Command implementations

mod duty;
mod officer;
mod serve;
mod token;

pub use duty::duty_preview;
pub use officer::officer_bootstrap;
pub use serve::serve;
pub use token::token_issue;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use idir::adapters::JsonStore;
use idir::config::AppConfig;

/// Load config from `--config`, the usual locations and the environment
fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    Ok(AppConfig::load(path)?)
}

/// Open the document store named by the config
fn open_store(config: &AppConfig) -> anyhow::Result<Arc<JsonStore>> {
    let dir = &config.storage.data_dir;
    let store = JsonStore::open(dir)
        .with_context(|| format!("cannot open data directory {}", dir.display()))?;
    Ok(Arc::new(store))
}
