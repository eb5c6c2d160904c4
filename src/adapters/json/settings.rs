//! Settings repository on the JSON store

use crate::core::models::Setting;
use crate::core::ports::{SettingsRepository, StoreResult};

use super::{JsonStore, SETTINGS};

impl SettingsRepository for JsonStore {
    fn get(&self, key: &str) -> StoreResult<Option<Setting>> {
        self.read_doc(SETTINGS, key)
    }

    fn list(&self) -> StoreResult<Vec<Setting>> {
        let mut settings: Vec<Setting> = self.list_docs(SETTINGS)?;
        settings.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(settings)
    }

    fn put(&self, setting: &Setting) -> StoreResult<()> {
        self.write_doc(SETTINGS, &setting.key, setting)
    }

    fn upsert(
        &self,
        key: &str,
        change: &mut dyn FnMut(Option<Setting>) -> Setting,
    ) -> StoreResult<Setting> {
        self.upsert_doc(SETTINGS, key, |current| Ok(change(current)))
    }

    fn insert_if_absent(&self, setting: &Setting) -> StoreResult<bool> {
        self.insert_doc(SETTINGS, &setting.key, setting)
    }
}
