//! Cash book on the JSON store

use crate::core::models::CashEntry;
use crate::core::ports::{CashBookRepository, StoreError, StoreResult};

use super::{CASH, JsonStore, numeric_key};

impl CashBookRepository for JsonStore {
    fn append(&self, mut entry: CashEntry) -> StoreResult<CashEntry> {
        // Ids race between concurrent appends; retry on a taken key.
        for _ in 0..8 {
            entry.id = CashBookRepository::list(self)?.last().map_or(0, |e| e.id) + 1;
            if self.insert_doc(CASH, &numeric_key(entry.id), &entry)? {
                return Ok(entry);
            }
        }
        Err(StoreError::duplicate(CASH, entry.id))
    }

    fn list(&self) -> StoreResult<Vec<CashEntry>> {
        let mut entries: Vec<CashEntry> = self.list_docs(CASH)?;
        entries.sort_by_key(|e| e.id);
        Ok(entries)
    }
}
