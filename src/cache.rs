//! Read-through cache for the settings registry
//!
//! Settings are read on most fine and cash-book requests but change rarely.
//! The cache holds one snapshot of the whole registry for a fixed TTL;
//! writers call [`SettingsCache::invalidate`] after updating the store.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::core::models::Setting;
use crate::core::ports::{SettingsRepository, StoreResult};

/// Default time a snapshot stays fresh
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug)]
struct Snapshot {
    settings: BTreeMap<String, Setting>,
    loaded_at: Instant,
}

impl Snapshot {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.loaded_at.elapsed() < ttl
    }
}

/// TTL cache in front of a [`SettingsRepository`]
pub struct SettingsCache {
    repo: Arc<dyn SettingsRepository>,
    ttl: Duration,
    snapshot: Mutex<Option<Snapshot>>,
}

impl std::fmt::Debug for SettingsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsCache")
            .field("ttl", &self.ttl)
            .field("warm", &self.is_warm())
            .finish_non_exhaustive()
    }
}

impl SettingsCache {
    /// Cache over `repo` with snapshots living for `ttl`
    pub fn new(repo: Arc<dyn SettingsRepository>, ttl: Duration) -> Self {
        Self {
            repo,
            ttl,
            snapshot: Mutex::new(None),
        }
    }

    /// Snapshot lifetime
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, Option<Snapshot>> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a fresh snapshot is held
    #[must_use]
    pub fn is_warm(&self) -> bool {
        self.lock().as_ref().is_some_and(|s| s.is_fresh(self.ttl))
    }

    /// Drop the snapshot so the next read goes to the store
    pub fn invalidate(&self) {
        log::debug!("Settings cache invalidated");
        *self.lock() = None;
    }

    fn with_snapshot<R>(&self, read: impl FnOnce(&BTreeMap<String, Setting>) -> R) -> StoreResult<R> {
        let mut guard = self.lock();
        if let Some(snapshot) = guard.as_ref().filter(|s| s.is_fresh(self.ttl)) {
            return Ok(read(&snapshot.settings));
        }

        let settings: BTreeMap<String, Setting> = self
            .repo
            .list()?
            .into_iter()
            .map(|s| (s.key.clone(), s))
            .collect();
        log::debug!("Settings cache loaded {} settings", settings.len());
        let result = read(&settings);
        *guard = Some(Snapshot {
            settings,
            loaded_at: Instant::now(),
        });
        Ok(result)
    }

    /// One setting
    pub fn get(&self, key: &str) -> StoreResult<Option<Setting>> {
        self.with_snapshot(|settings| settings.get(key).cloned())
    }

    /// Current value of one setting
    pub fn value(&self, key: &str) -> StoreResult<Option<f64>> {
        self.with_snapshot(|settings| settings.get(key).map(|s| s.value))
    }

    /// Every setting, ordered by key
    pub fn list(&self) -> StoreResult<Vec<Setting>> {
        self.with_snapshot(|settings| settings.values().cloned().collect())
    }
}
