//! Run the HTTP API

use std::path::Path;
use std::sync::Arc;

use idir::api::AppContext;
use idir::auth::TokenSigner;
use idir::server;

use super::{load_config, open_store};

/// Start the server and block until it stops
pub fn serve(config: Option<&Path>, bind: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = load_config(config)?;
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let secret = config.token_secret()?;
    let tokens = TokenSigner::new(secret, config.token_ttl())?;
    let store = open_store(&config)?;
    log::info!("Data directory: {}", store.root().display());

    let ctx = AppContext::with_store(
        store,
        tokens,
        config.rotation_policy(),
        config.settings_cache_ttl(),
    );
    log::debug!("Settings cache TTL: {:?}", ctx.settings_cache.ttl());
    let seeded = ctx.seed_settings()?;
    if seeded > 0 {
        log::info!("Seeded {seeded} default settings");
    }

    server::serve(Arc::new(ctx), &config.listen_addr(), config.server.workers)
}
