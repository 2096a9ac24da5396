//! Users and the cars they own.

use super::ids::{CarId, SlotId, UserId};
use super::lifecycle::TransitionConflict;

/// Maximum accepted length of a user name, in characters.
pub const USER_NAME_MAX: usize = 64;

/// Validation errors raised by [`User::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Name is empty once trimmed.
    #[error("name must not be empty")]
    EmptyName,
    /// Name exceeds [`USER_NAME_MAX`] characters.
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Upper bound on the name length.
        max: usize,
    },
}

/// A person who owns cars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
}

impl User {
    /// Validate and construct a user.
    pub fn new(id: UserId, name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if name.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self { id, name })
    }

    /// Rebuild a stored user.
    pub const fn from_parts(id: UserId, name: String) -> Self {
        Self { id, name }
    }

    /// User identifier.
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// A car registered to a user.
///
/// `slot_id` is set exactly while the car is parked, and then the referenced
/// slot records this car as its occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Car {
    id: CarId,
    user_id: UserId,
    slot_id: Option<SlotId>,
}

impl Car {
    /// Register a new, unparked car.
    pub const fn new(id: CarId, user_id: UserId) -> Self {
        Self {
            id,
            user_id,
            slot_id: None,
        }
    }

    /// Rebuild a stored car.
    pub const fn from_parts(id: CarId, user_id: UserId, slot_id: Option<SlotId>) -> Self {
        Self {
            id,
            user_id,
            slot_id,
        }
    }

    /// Car identifier.
    pub const fn id(&self) -> CarId {
        self.id
    }

    /// Owning user.
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Slot the car is parked in.
    pub const fn slot_id(&self) -> Option<SlotId> {
        self.slot_id
    }

    /// Fail with `AlreadyParked` if the car holds a slot.
    pub const fn ensure_unparked(&self) -> Result<(), TransitionConflict> {
        match self.slot_id {
            Some(_) => Err(TransitionConflict::AlreadyParked),
            None => Ok(()),
        }
    }

    /// Slot the car must leave, or `AlreadyUnparked`.
    pub const fn parked_slot(&self) -> Result<SlotId, TransitionConflict> {
        match self.slot_id {
            Some(slot_id) => Ok(slot_id),
            None => Err(TransitionConflict::AlreadyUnparked),
        }
    }
}
