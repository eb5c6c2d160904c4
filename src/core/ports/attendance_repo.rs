//! Attendance repository port

use chrono::NaiveDate;

use crate::core::models::{AttendanceKind, AttendanceRecord};

use super::StoreResult;

/// Repository for meeting and common-work attendance
pub trait AttendanceRepository: Send + Sync {
    /// Insert or replace the record for `(record.kind, record.date)`.
    ///
    /// Returns `true` when a new record was created.
    fn upsert(&self, record: &AttendanceRecord) -> StoreResult<bool>;

    /// Record for one date
    fn get(&self, kind: AttendanceKind, date: NaiveDate) -> StoreResult<Option<AttendanceRecord>>;

    /// All records of a kind, ascending by date
    fn list(&self, kind: AttendanceKind) -> StoreResult<Vec<AttendanceRecord>>;
}
