//! Slot lifecycle state machine.
//!
//! | Transition             | Valid from    | Result        |
//! |------------------------|---------------|---------------|
//! | `Park`                 | Free          | Occupied      |
//! | `Unpark`               | Occupied      | Free          |
//! | `PutInMaintenance`     | Free          | InMaintenance |
//! | `TakeOutOfMaintenance` | InMaintenance | Free          |
//!
//! Applying a transition is pure: it returns the next slot value (with its
//! revision bumped) and leaves persisting it to the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::CarId;
use super::slot::{Slot, SlotState};

/// Typed reasons a transition is refused by the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum TransitionConflict {
    /// The slot is occupied by a car.
    #[error("parking slot is already booked")]
    AlreadyBooked,
    /// The slot is already in maintenance.
    #[error("parking slot is already in maintenance")]
    AlreadyInMaintenance,
    /// The slot is not in maintenance.
    #[error("parking slot is not in maintenance")]
    NotInMaintenance,
    /// The car already holds a slot.
    #[error("car is already parked")]
    AlreadyParked,
    /// The car does not hold the slot it tried to leave.
    #[error("car is already unparked")]
    AlreadyUnparked,
}

impl TransitionConflict {
    /// Stable snake_case name used in error details.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyBooked => "already_booked",
            Self::AlreadyInMaintenance => "already_in_maintenance",
            Self::NotInMaintenance => "not_in_maintenance",
            Self::AlreadyParked => "already_parked",
            Self::AlreadyUnparked => "already_unparked",
        }
    }
}

/// Requested slot transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTransition {
    /// Book a free slot for a car.
    Park {
        /// Car taking the slot.
        car_id: CarId,
        /// Instant of arrival.
        at: DateTime<Utc>,
    },
    /// Release the slot held by a car.
    Unpark {
        /// Car leaving the slot.
        car_id: CarId,
        /// Instant of departure.
        at: DateTime<Utc>,
    },
    /// Hold a free slot back for maintenance.
    PutInMaintenance,
    /// Return a slot in maintenance to service.
    TakeOutOfMaintenance,
}

impl SlotTransition {
    /// Maintenance toggle for the requested mode.
    pub const fn maintenance(enabled: bool) -> Self {
        if enabled {
            Self::PutInMaintenance
        } else {
            Self::TakeOutOfMaintenance
        }
    }
}

impl Slot {
    /// Compute the slot that results from `transition`.
    ///
    /// # Errors
    /// Returns the [`TransitionConflict`] describing why the current state
    /// forbids the transition.
    pub fn apply(&self, transition: SlotTransition) -> Result<Self, TransitionConflict> {
        match (self.state(), transition) {
            (SlotState::Free, SlotTransition::Park { car_id, at }) => Ok(self.with_state(
                SlotState::Occupied {
                    car_id,
                    parked_at: at,
                },
                None,
            )),
            (SlotState::Occupied { .. }, SlotTransition::Park { .. })
            | (
                SlotState::Occupied { .. },
                SlotTransition::PutInMaintenance | SlotTransition::TakeOutOfMaintenance,
            ) => Err(TransitionConflict::AlreadyBooked),
            (SlotState::InMaintenance, SlotTransition::Park { .. } | SlotTransition::PutInMaintenance) => {
                Err(TransitionConflict::AlreadyInMaintenance)
            }

            (SlotState::Occupied { car_id, .. }, SlotTransition::Unpark { car_id: leaving, at })
                if car_id == leaving =>
            {
                Ok(self.with_state(SlotState::Free, Some(at)))
            }
            (_, SlotTransition::Unpark { .. }) => Err(TransitionConflict::AlreadyUnparked),

            (SlotState::Free, SlotTransition::PutInMaintenance) => {
                Ok(self.with_state(SlotState::InMaintenance, self.unparked_at()))
            }
            (SlotState::InMaintenance, SlotTransition::TakeOutOfMaintenance) => {
                Ok(self.with_state(SlotState::Free, self.unparked_at()))
            }
            (SlotState::Free, SlotTransition::TakeOutOfMaintenance) => {
                Err(TransitionConflict::NotInMaintenance)
            }
        }
    }
}
