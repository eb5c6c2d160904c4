//! Funeral repository on the JSON store

use crate::core::models::{FuneralEvent, RotationState};
use crate::core::ports::{FuneralRepository, StoreError, StoreResult};

use super::{FUNERALS, JsonStore, STATE, numeric_key};

const ROTATION_KEY: &str = "rotation";

impl FuneralRepository for JsonStore {
    fn next_id(&self) -> StoreResult<u32> {
        Ok(FuneralRepository::list(self)?.iter().map(|e| e.id).max().unwrap_or(0) + 1)
    }

    fn insert(&self, event: &FuneralEvent) -> StoreResult<()> {
        if self.insert_doc(FUNERALS, &numeric_key(event.id), event)? {
            Ok(())
        } else {
            Err(StoreError::duplicate(FUNERALS, event.id))
        }
    }

    fn get(&self, id: u32) -> StoreResult<Option<FuneralEvent>> {
        self.read_doc(FUNERALS, &numeric_key(id))
    }

    fn update(&self, event: &FuneralEvent) -> StoreResult<()> {
        self.replace_doc(FUNERALS, &numeric_key(event.id), event)
            .map_err(|e| match e {
                StoreError::NotFound { collection, .. } => StoreError::not_found(collection, event.id),
                other => other,
            })
    }

    fn list(&self) -> StoreResult<Vec<FuneralEvent>> {
        let mut events: Vec<FuneralEvent> = self.list_docs(FUNERALS)?;
        events.sort_by_key(|e| e.id);
        Ok(events)
    }

    fn rotation_state(&self) -> StoreResult<RotationState> {
        Ok(self.read_doc(STATE, ROTATION_KEY)?.unwrap_or_default())
    }

    fn save_rotation_state(&self, state: &RotationState) -> StoreResult<()> {
        self.write_doc(STATE, ROTATION_KEY, state)
    }
}
