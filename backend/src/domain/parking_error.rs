//! Failures of the parking operations.
//!
//! Conflicts are surfaced immediately and nothing is mutated when one is
//! returned. Storage failures carry the adapter error unchanged.

use serde_json::json;

use super::error::Error;
use super::lifecycle::TransitionConflict;
use super::lot::LotValidationError;
use super::account::UserValidationError;
use super::ports::StorageError;

/// Entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A parking lot.
    Lot,
    /// A slot.
    Slot,
    /// A car.
    Car,
    /// A user.
    User,
}

impl Entity {
    /// Lowercase label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lot => "parking lot",
            Self::Slot => "parking slot",
            Self::Car => "car",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every parking operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParkingError {
    /// Input is malformed or out of range.
    #[error("{message}")]
    Validation {
        /// What was wrong with the input.
        message: String,
    },
    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of entity.
        entity: Entity,
        /// Identifier that was looked up.
        id: String,
    },
    /// The current state forbids the requested transition.
    #[error(transparent)]
    Conflict(#[from] TransitionConflict),
    /// No free slot could be reserved.
    #[error("no free parking slot available in lot {lot_id}")]
    ResourceExhausted {
        /// Lot that was searched.
        lot_id: String,
    },
    /// The store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ParkingError {
    /// Build a [`ParkingError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Build a [`ParkingError::NotFound`].
    pub fn not_found(entity: Entity, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Build a [`ParkingError::ResourceExhausted`].
    pub fn resource_exhausted(lot_id: impl ToString) -> Self {
        Self::ResourceExhausted {
            lot_id: lot_id.to_string(),
        }
    }
}

impl From<LotValidationError> for ParkingError {
    fn from(err: LotValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<UserValidationError> for ParkingError {
    fn from(err: UserValidationError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<ParkingError> for Error {
    fn from(err: ParkingError) -> Self {
        match err {
            ParkingError::Validation { message } => Self::invalid_request(message),
            ParkingError::NotFound { entity, ref id } => Self::not_found(err.to_string())
                .with_details(json!({ "entity": entity.as_str(), "id": id })),
            ParkingError::Conflict(conflict) => Self::conflict(conflict.to_string())
                .with_details(json!({ "reason": conflict.as_str() })),
            ParkingError::ResourceExhausted { ref lot_id } => {
                Self::resource_exhausted(err.to_string()).with_details(json!({ "lotId": lot_id }))
            }
            ParkingError::Storage(storage) if storage.is_unavailable() => {
                Self::service_unavailable("parking store unavailable")
            }
            ParkingError::Storage(storage) => Self::internal(storage.to_string()),
        }
    }
}
