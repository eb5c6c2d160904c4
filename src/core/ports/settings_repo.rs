//! Settings repository port

use crate::core::models::Setting;

use super::StoreResult;

/// Repository for the settings registry
pub trait SettingsRepository: Send + Sync {
    /// Get a setting by key
    fn get(&self, key: &str) -> StoreResult<Option<Setting>>;

    /// All settings, ordered by key
    fn list(&self) -> StoreResult<Vec<Setting>>;

    /// Insert or replace a setting
    fn put(&self, setting: &Setting) -> StoreResult<()>;

    /// Create or change a setting under the store's write lock.
    ///
    /// `change` receives the stored setting (if any) and returns the value
    /// to write, so each update builds on the latest history.
    fn upsert(
        &self,
        key: &str,
        change: &mut dyn FnMut(Option<Setting>) -> Setting,
    ) -> StoreResult<Setting>;

    /// Insert only if the key is absent; returns `true` if inserted
    fn insert_if_absent(&self, setting: &Setting) -> StoreResult<bool>;
}
