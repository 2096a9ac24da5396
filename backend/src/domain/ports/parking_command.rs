//! Driving port for parking mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CarId, Lot, LotId, ParkingError, Slot, SlotId};

/// Request to create a lot with `slot_count` free slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateLotRequest {
    /// Location label.
    pub location: String,
    /// Number of slots, at least one.
    pub slot_count: u32,
}

/// A freshly created lot and its slots ordered by relative id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedLot {
    /// Lot metadata.
    pub lot: Lot,
    /// Slots numbered `1..=slot_count`.
    pub slots: Vec<Slot>,
}

/// Request to park a car in a lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParkCarRequest {
    /// Lot to park in.
    pub lot_id: LotId,
    /// Car to park.
    pub car_id: CarId,
}

/// Request to toggle maintenance on a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetMaintenanceRequest {
    /// Slot to toggle.
    pub slot_id: SlotId,
    /// `true` puts the slot in maintenance, `false` takes it out.
    pub enabled: bool,
}

/// Bill issued when a car leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnparkReceipt {
    /// Slot the car left.
    pub slot_id: SlotId,
    /// Billed hours, partial hours rounded up.
    pub duration_hours: u64,
    /// Fee in currency units.
    pub amount: u64,
    /// Instant of departure.
    pub unparked_at: DateTime<Utc>,
}

/// Parking use-cases that change state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParkingCommand: Send + Sync {
    /// Create a lot and all of its slots atomically.
    async fn create_lot(&self, request: CreateLotRequest) -> Result<CreatedLot, ParkingError>;

    /// Park a car in the lowest free slot of a lot; returns the booked slot.
    async fn park_car(&self, request: ParkCarRequest) -> Result<Slot, ParkingError>;

    /// Release the slot held by a car and bill the stay.
    async fn unpark_car(&self, car_id: CarId) -> Result<UnparkReceipt, ParkingError>;

    /// Put a slot into or out of maintenance; returns the updated slot.
    async fn set_maintenance(&self, request: SetMaintenanceRequest)
    -> Result<Slot, ParkingError>;
}
