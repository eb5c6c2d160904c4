//! Funeral event repository port

use crate::core::models::{FuneralEvent, RotationState};

use super::StoreResult;

/// Repository for funeral events and the rotation cursor
pub trait FuneralRepository: Send + Sync {
    /// Next unused event id
    fn next_id(&self) -> StoreResult<u32>;

    /// Insert a new event; fails with `Duplicate` if the id is taken
    fn insert(&self, event: &FuneralEvent) -> StoreResult<()>;

    /// Get an event by id
    fn get(&self, id: u32) -> StoreResult<Option<FuneralEvent>>;

    /// Replace an existing event
    fn update(&self, event: &FuneralEvent) -> StoreResult<()>;

    /// All events, ascending by id
    fn list(&self) -> StoreResult<Vec<FuneralEvent>>;

    /// Current rotation cursor (default when never planned)
    fn rotation_state(&self) -> StoreResult<RotationState>;

    /// Persist the rotation cursor
    fn save_rotation_state(&self, state: &RotationState) -> StoreResult<()>;
}
