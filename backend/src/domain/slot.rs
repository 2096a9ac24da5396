//! Parking slot entity.
//!
//! A slot is in exactly one [`SlotState`]. The flat flag view used by
//! storage (`is_booked`, `is_in_maintenance`, `car_id`, `parked_at`) is
//! derived from that state, so a slot can never be occupied and under
//! maintenance at the same time.
//!
//! Every committed transition bumps `revision`; persistence adapters use it as
//! the optimistic-concurrency guard.

use std::fmt;

use chrono::{DateTime, Utc};

use super::ids::{CarId, LotId, SlotId};

/// One-based position of a slot inside its lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativeSlotId(u32);

impl RelativeSlotId {
    /// Wrap a relative slot number.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw slot number.
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RelativeSlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Available for parking.
    Free,
    /// Booked by a parked car.
    Occupied {
        /// Car currently parked in the slot.
        car_id: CarId,
        /// Instant the car parked.
        parked_at: DateTime<Utc>,
    },
    /// Held back for maintenance; counts as booked.
    InMaintenance,
}

/// Flat slot representation exchanged with storage adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRecord {
    /// Slot identifier.
    pub id: SlotId,
    /// Owning lot.
    pub lot_id: LotId,
    /// Position inside the lot.
    pub relative_id: u32,
    /// Set when a car occupies the slot or it is in maintenance.
    pub is_booked: bool,
    /// Set while the slot is in maintenance.
    pub is_in_maintenance: bool,
    /// Car occupying the slot.
    pub car_id: Option<CarId>,
    /// Instant the current car parked.
    pub parked_at: Option<DateTime<Utc>>,
    /// Instant the most recent car left.
    pub unparked_at: Option<DateTime<Utc>>,
    /// Optimistic-concurrency counter.
    pub revision: u32,
}

/// Raised when a stored slot violates the flag invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotInvariantError {
    /// Both a car and maintenance were recorded.
    #[error("slot {slot_id} is occupied and in maintenance")]
    OccupiedInMaintenance {
        /// Offending slot.
        slot_id: SlotId,
    },
    /// `is_booked` disagrees with the car and maintenance columns.
    #[error("slot {slot_id} booking flag is inconsistent")]
    BookingFlagMismatch {
        /// Offending slot.
        slot_id: SlotId,
    },
    /// `parked_at` is present without a car or missing with one.
    #[error("slot {slot_id} parked_at does not match its car")]
    ParkedAtMismatch {
        /// Offending slot.
        slot_id: SlotId,
    },
    /// `relative_id` is zero.
    #[error("slot {slot_id} has relative id 0")]
    ZeroRelativeId {
        /// Offending slot.
        slot_id: SlotId,
    },
}

/// A parking space within a lot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    id: SlotId,
    lot_id: LotId,
    relative_id: RelativeSlotId,
    state: SlotState,
    unparked_at: Option<DateTime<Utc>>,
    revision: u32,
}

impl Slot {
    /// Create a never-used free slot.
    pub const fn free(id: SlotId, lot_id: LotId, relative_id: RelativeSlotId) -> Self {
        Self {
            id,
            lot_id,
            relative_id,
            state: SlotState::Free,
            unparked_at: None,
            revision: 0,
        }
    }

    /// Rebuild a slot from its flat record, checking the flag invariants.
    pub fn from_record(record: SlotRecord) -> Result<Self, SlotInvariantError> {
        let SlotRecord {
            id,
            lot_id,
            relative_id,
            is_booked,
            is_in_maintenance,
            car_id,
            parked_at,
            unparked_at,
            revision,
        } = record;

        if relative_id == 0 {
            return Err(SlotInvariantError::ZeroRelativeId { slot_id: id });
        }
        if is_booked != (car_id.is_some() || is_in_maintenance) {
            return Err(SlotInvariantError::BookingFlagMismatch { slot_id: id });
        }
        let state = match (car_id, parked_at, is_in_maintenance) {
            (Some(_), _, true) => {
                return Err(SlotInvariantError::OccupiedInMaintenance { slot_id: id });
            }
            (Some(car_id), Some(parked_at), false) => SlotState::Occupied { car_id, parked_at },
            (None, None, true) => SlotState::InMaintenance,
            (None, None, false) => SlotState::Free,
            (Some(_), None, false) | (None, Some(_), _) => {
                return Err(SlotInvariantError::ParkedAtMismatch { slot_id: id });
            }
        };

        Ok(Self {
            id,
            lot_id,
            relative_id: RelativeSlotId::new(relative_id),
            state,
            unparked_at,
            revision,
        })
    }

    /// Flatten into the storage representation.
    pub fn to_record(&self) -> SlotRecord {
        SlotRecord {
            id: self.id,
            lot_id: self.lot_id,
            relative_id: self.relative_id.get(),
            is_booked: self.is_booked(),
            is_in_maintenance: self.is_in_maintenance(),
            car_id: self.car_id(),
            parked_at: self.parked_at(),
            unparked_at: self.unparked_at,
            revision: self.revision,
        }
    }

    pub(crate) fn with_state(
        &self,
        state: SlotState,
        unparked_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: self.id,
            lot_id: self.lot_id,
            relative_id: self.relative_id,
            state,
            unparked_at,
            revision: self.revision.wrapping_add(1),
        }
    }

    /// Slot identifier.
    pub const fn id(&self) -> SlotId {
        self.id
    }

    /// Owning lot.
    pub const fn lot_id(&self) -> LotId {
        self.lot_id
    }

    /// Position inside the lot.
    pub const fn relative_id(&self) -> RelativeSlotId {
        self.relative_id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SlotState {
        self.state
    }

    /// Whether the slot is unavailable for parking.
    pub const fn is_booked(&self) -> bool {
        !matches!(self.state, SlotState::Free)
    }

    /// Whether the slot is in maintenance.
    pub const fn is_in_maintenance(&self) -> bool {
        matches!(self.state, SlotState::InMaintenance)
    }

    /// Car parked in the slot, if any.
    pub const fn car_id(&self) -> Option<CarId> {
        match self.state {
            SlotState::Occupied { car_id, .. } => Some(car_id),
            SlotState::Free | SlotState::InMaintenance => None,
        }
    }

    /// Instant the current car parked.
    pub fn parked_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            SlotState::Occupied { parked_at, .. } => Some(parked_at),
            SlotState::Free | SlotState::InMaintenance => None,
        }
    }

    /// Instant the most recent car left.
    pub fn unparked_at(&self) -> Option<DateTime<Utc>> {
        self.unparked_at
    }

    /// Optimistic-concurrency counter.
    pub const fn revision(&self) -> u32 {
        self.revision
    }
}
