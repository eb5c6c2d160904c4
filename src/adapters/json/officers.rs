//! Officer repository on the JSON store

use crate::core::models::Officer;
use crate::core::ports::{OfficerRepository, StoreError, StoreResult};

use super::{JsonStore, OFFICERS};

impl OfficerRepository for JsonStore {
    fn create(&self, officer: &Officer) -> StoreResult<()> {
        if self.insert_doc(OFFICERS, &officer.username, officer)? {
            Ok(())
        } else {
            Err(StoreError::duplicate(OFFICERS, &officer.username))
        }
    }

    fn get(&self, username: &str) -> StoreResult<Option<Officer>> {
        self.read_doc(OFFICERS, username)
    }

    fn update(&self, officer: &Officer) -> StoreResult<()> {
        self.replace_doc(OFFICERS, &officer.username, officer)
    }

    fn delete(&self, username: &str) -> StoreResult<bool> {
        self.delete_doc(OFFICERS, username)
    }

    fn list(&self) -> StoreResult<Vec<Officer>> {
        let mut officers: Vec<Officer> = self.list_docs(OFFICERS)?;
        officers.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(officers)
    }
}
