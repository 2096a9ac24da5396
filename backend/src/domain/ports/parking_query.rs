//! Driving port for parking reads.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{CarId, DailyHistory, LotId, ParkingError, Slot, SlotId};

/// Occupancy of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotStatus {
    /// Slot identifier.
    pub slot_id: SlotId,
    /// Position inside the lot.
    pub relative_id: u32,
    /// Unavailable for parking.
    pub is_booked: bool,
    /// Held for maintenance.
    pub is_in_maintenance: bool,
    /// Car parked in the slot.
    pub car_id: Option<CarId>,
}

impl From<&Slot> for SlotStatus {
    fn from(slot: &Slot) -> Self {
        Self {
            slot_id: slot.id(),
            relative_id: slot.relative_id().get(),
            is_booked: slot.is_booked(),
            is_in_maintenance: slot.is_in_maintenance(),
            car_id: slot.car_id(),
        }
    }
}

/// Parking use-cases that only read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParkingQuery: Send + Sync {
    /// Status of every slot in a lot ordered by relative id.
    async fn lot_status(&self, lot_id: LotId) -> Result<Vec<SlotStatus>, ParkingError>;

    /// Usage totals for a day; zeroed when nothing happened.
    async fn history(&self, day: NaiveDate) -> Result<DailyHistory, ParkingError>;
}
