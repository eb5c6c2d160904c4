//! Member repository port

use crate::core::models::Member;

use super::StoreResult;

/// Repository for member records
pub trait MemberRepository: Send + Sync {
    /// Insert a new member; fails with `Duplicate` if the id is taken
    fn insert(&self, member: &Member) -> StoreResult<()>;

    /// Get a member by id
    fn get(&self, id: u32) -> StoreResult<Option<Member>>;

    /// Replace an existing member; fails with `NotFound` if absent
    fn update(&self, member: &Member) -> StoreResult<()>;

    /// Change one member under the store's write lock and return the result.
    ///
    /// If `change` fails the stored member is left as it was; concurrent
    /// changes to the same member are applied one after the other.
    fn modify(
        &self,
        id: u32,
        change: &mut dyn FnMut(&mut Member) -> StoreResult<()>,
    ) -> StoreResult<Member>;

    /// All members, ascending by id
    fn list(&self) -> StoreResult<Vec<Member>>;

    /// Next unused id (one past the highest)
    fn next_id(&self) -> StoreResult<u32> {
        Ok(self.list()?.iter().map(|m| m.id).max().unwrap_or(0) + 1)
    }
}
