//! Parking lot aggregate.
//!
//! A lot and all of its slots come into existence together. Slot relative
//! identifiers are contiguous, unique within the lot, and start at one.

use chrono::{DateTime, Utc};

use super::ids::{LotId, SlotId};
use super::slot::{RelativeSlotId, Slot};

/// Maximum number of slots accepted when creating a lot.
pub const MAX_SLOTS_PER_LOT: u32 = 10_000;

/// Validation errors raised while constructing a [`Lot`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LotValidationError {
    /// The location label is empty once trimmed.
    #[error("location must not be empty")]
    EmptyLocation,
    /// Fewer than one slot was requested.
    #[error("slot count must be at least 1")]
    NoSlots,
    /// More slots than the supported maximum were requested.
    #[error("slot count must be at most {max}")]
    TooManySlots {
        /// Upper bound on the slot count.
        max: u32,
    },
}

/// Persisted parking lot metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lot {
    id: LotId,
    location: String,
    slot_count: u32,
    created_at: DateTime<Utc>,
}

impl Lot {
    /// Validate a lot creation request.
    pub fn new(
        id: LotId,
        location: impl Into<String>,
        slot_count: u32,
        created_at: DateTime<Utc>,
    ) -> Result<Self, LotValidationError> {
        let location = location.into().trim().to_owned();
        if location.is_empty() {
            return Err(LotValidationError::EmptyLocation);
        }
        if slot_count < 1 {
            return Err(LotValidationError::NoSlots);
        }
        if slot_count > MAX_SLOTS_PER_LOT {
            return Err(LotValidationError::TooManySlots {
                max: MAX_SLOTS_PER_LOT,
            });
        }
        Ok(Self {
            id,
            location,
            slot_count,
            created_at,
        })
    }

    /// Rebuild a lot loaded from storage without re-validating it.
    pub fn from_parts(
        id: LotId,
        location: String,
        slot_count: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            location,
            slot_count,
            created_at,
        }
    }

    /// Lot identifier.
    pub const fn id(&self) -> LotId {
        self.id
    }

    /// Location label.
    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    /// Number of slots owned by the lot.
    pub const fn slot_count(&self) -> u32 {
        self.slot_count
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Build the free slots numbered `1..=slot_count`.
    pub fn initial_slots(&self) -> Vec<Slot> {
        (1..=self.slot_count)
            .map(|n| Slot::free(SlotId::random(), self.id, RelativeSlotId::new(n)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SlotState;
    use rstest::rstest;

    fn created_at() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
    }

    #[rstest]
    fn initial_slots_are_free_and_contiguous() {
        let lot = Lot::new(LotId::random(), "Level 1", 4, created_at()).expect("valid lot");
        let slots = lot.initial_slots();

        let relative: Vec<u32> = slots.iter().map(|s| s.relative_id().get()).collect();
        assert_eq!(relative, vec![1, 2, 3, 4]);
        assert!(slots.iter().all(|s| s.state() == SlotState::Free));
        assert!(slots.iter().all(|s| s.lot_id() == lot.id()));
    }

    #[rstest]
    #[case("Main street", 0, LotValidationError::NoSlots)]
    #[case("   ", 3, LotValidationError::EmptyLocation)]
    #[case("Depot", MAX_SLOTS_PER_LOT + 1, LotValidationError::TooManySlots { max: MAX_SLOTS_PER_LOT })]
    fn rejects_invalid_requests(
        #[case] location: &str,
        #[case] slots: u32,
        #[case] expected: LotValidationError,
    ) {
        let err = Lot::new(LotId::random(), location, slots, created_at()).expect_err("invalid");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn trims_location() {
        let lot = Lot::new(LotId::random(), "  North  ", 1, created_at()).expect("valid lot");
        assert_eq!(lot.location(), "North");
    }
}
