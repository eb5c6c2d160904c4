//! Cash book repository port

use crate::core::models::CashEntry;

use super::StoreResult;

/// Append-only cash book
pub trait CashBookRepository: Send + Sync {
    /// Append an entry; the store assigns its id and returns the stored entry
    fn append(&self, entry: CashEntry) -> StoreResult<CashEntry>;

    /// All entries, ascending by id
    fn list(&self) -> StoreResult<Vec<CashEntry>>;
}
