//! Port for lot and slot persistence.

use async_trait::async_trait;

use crate::domain::{Lot, LotId, Slot, SlotId};

use super::StorageError;

/// Port for creating lots and reading their slots.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LotRepository: Send + Sync {
    /// Persist a lot together with all of its slots.
    ///
    /// Implementations must write the lot and every slot as one atomic unit:
    /// either all rows exist afterwards or none do.
    async fn create_lot(&self, lot: &Lot, slots: &[Slot]) -> Result<(), StorageError>;

    /// Find a lot by id.
    async fn find_lot(&self, lot_id: &LotId) -> Result<Option<Lot>, StorageError>;

    /// List every slot in a lot ordered by relative id.
    async fn list_slots(&self, lot_id: &LotId) -> Result<Vec<Slot>, StorageError>;

    /// Find a slot by id.
    async fn find_slot(&self, slot_id: &SlotId) -> Result<Option<Slot>, StorageError>;

    /// Return the unbooked slot with the lowest relative id, if any.
    async fn find_first_free_slot(&self, lot_id: &LotId) -> Result<Option<Slot>, StorageError>;
}
