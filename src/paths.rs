//! Centralized path definitions for idir
//!
//! ## Storage Layout
//!
//! ```text
//! ~/.config/idir/
//! └── config.toml              # Service configuration
//!
//! ~/.local/share/idir/          # Data directory (JSON document store)
//! ├── members/0000000042.json
//! ├── loans/LN-2026-001.json
//! ├── attendance/meeting/2026-05-03.json
//! ├── funerals/0000000007.json
//! ├── settings/meeting-absence-fine.json
//! ├── officers/secretary1.json
//! ├── cash/0000000001.json
//! └── state/rotation.json
//! ```

use std::path::PathBuf;

/// Application directory name under the platform config/data dirs
const APP_DIR: &str = "idir";

/// Config filename
const CONFIG_FILE: &str = "config.toml";

/// Config file in the working directory, checked before the global one
pub const LOCAL_CONFIG: &str = "idir.toml";

/// Get the global config directory.
///
/// Returns `~/.config/idir/` on Linux.
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Get the global config file path.
#[must_use]
pub fn global_config() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Get the default data directory.
///
/// Returns `~/.local/share/idir/` on Linux.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
