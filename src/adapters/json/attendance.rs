//! Attendance repository on the JSON store

use chrono::NaiveDate;

use crate::core::models::{AttendanceKind, AttendanceRecord};
use crate::core::ports::{AttendanceRepository, StoreResult};

use super::JsonStore;

fn collection(kind: AttendanceKind) -> String {
    format!("attendance/{}", kind.as_str())
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl AttendanceRepository for JsonStore {
    fn upsert(&self, record: &AttendanceRecord) -> StoreResult<bool> {
        let collection = collection(record.kind);
        let key = date_key(record.date);
        if self.insert_doc(&collection, &key, record)? {
            return Ok(true);
        }
        self.write_doc(&collection, &key, record)?;
        Ok(false)
    }

    fn get(&self, kind: AttendanceKind, date: NaiveDate) -> StoreResult<Option<AttendanceRecord>> {
        self.read_doc(&collection(kind), &date_key(date))
    }

    fn list(&self, kind: AttendanceKind) -> StoreResult<Vec<AttendanceRecord>> {
        let mut records: Vec<AttendanceRecord> = self.list_docs(&collection(kind))?;
        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}
