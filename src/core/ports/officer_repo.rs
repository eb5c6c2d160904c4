//! Officer repository port

use crate::core::models::Officer;

use super::StoreResult;

/// Repository for officer accounts
pub trait OfficerRepository: Send + Sync {
    /// Create an officer; fails with `Duplicate` if the username exists
    fn create(&self, officer: &Officer) -> StoreResult<()>;

    /// Get an officer by username
    fn get(&self, username: &str) -> StoreResult<Option<Officer>>;

    /// Replace an existing officer
    fn update(&self, officer: &Officer) -> StoreResult<()>;

    /// Delete an officer; returns `true` if it existed
    fn delete(&self, username: &str) -> StoreResult<bool>;

    /// All officers, ordered by username
    fn list(&self) -> StoreResult<Vec<Officer>>;
}
