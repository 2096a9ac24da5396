//! Port committing slot lifecycle transitions.
//!
//! A [`SlotCommit`] is an optimistic conditional update. The slot row is
//! written only if its stored revision still equals the revision observed
//! when the transition was computed. When the commit also links a car, the
//! car row is written only if its slot reference still equals the expected
//! one. An unpark commit also carries the day's usage increment, which is
//! added to the history in the same unit. Every write succeeds together or
//! none does.

use async_trait::async_trait;

use crate::domain::{CarId, DayUsage, Slot, SlotId};

use super::StorageError;

/// Car-side half of a slot commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarLink {
    /// Car whose slot reference changes.
    pub car_id: CarId,
    /// Slot reference the car must currently hold.
    pub expected_slot: Option<SlotId>,
    /// Slot reference written on success.
    pub next_slot: Option<SlotId>,
}

/// Conditional update of one slot and, optionally, one car.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCommit {
    /// Slot state to write.
    pub slot: Slot,
    /// Revision the stored slot must still carry.
    pub expected_revision: u32,
    /// Car reference to move in the same unit.
    pub car: Option<CarLink>,
    /// History increment added in the same unit.
    pub usage: Option<DayUsage>,
}

impl SlotCommit {
    /// Book `next` for a car that must not be parked anywhere.
    pub fn park(current: &Slot, next: Slot, car_id: CarId) -> Self {
        let slot_id = next.id();
        Self {
            slot: next,
            expected_revision: current.revision(),
            car: Some(CarLink {
                car_id,
                expected_slot: None,
                next_slot: Some(slot_id),
            }),
            usage: None,
        }
    }

    /// Release `current` for the car that occupies it and credit `usage`.
    pub fn unpark(current: &Slot, next: Slot, car_id: CarId, usage: DayUsage) -> Self {
        Self {
            slot: next,
            expected_revision: current.revision(),
            car: Some(CarLink {
                car_id,
                expected_slot: Some(current.id()),
                next_slot: None,
            }),
            usage: Some(usage),
        }
    }

    /// Toggle maintenance; no car is involved.
    pub fn maintenance(current: &Slot, next: Slot) -> Self {
        Self {
            slot: next,
            expected_revision: current.revision(),
            car: None,
            usage: None,
        }
    }
}

/// Result of applying a [`SlotCommit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Both guards held and every write landed.
    Applied,
    /// The slot changed since it was read; nothing was written.
    StaleSlot,
    /// The car changed since it was read; the slot write was rolled back.
    StaleCar,
}

/// Port applying slot transitions atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlotTransitionRepository: Send + Sync {
    /// Apply a guarded slot (and car) update as one unit.
    async fn apply(&self, commit: &SlotCommit) -> Result<CommitOutcome, StorageError>;
}
