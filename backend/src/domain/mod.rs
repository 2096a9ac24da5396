//! Parking domain: entities, the slot lifecycle, allocation, billing, and
//! daily usage aggregation.
//!
//! Purpose: keep every rule about who may park where, and what it costs,
//! independent of HTTP and storage. Services talk to storage only through
//! the driven ports in [`ports`].
//!
//! Public surface:
//! - Entities: [`Lot`], [`Slot`], [`Car`], [`User`], [`DailyHistory`].
//! - State machine: [`SlotTransition`] applied with [`Slot::apply`].
//! - Services: [`ParkingService`] and [`AccountService`].
//! - Errors: [`ParkingError`] for operations, [`Error`] for transports.

pub mod account;
pub mod account_service;
pub mod allocator;
pub mod billing;
pub mod error;
pub mod history;
pub mod ids;
pub mod lifecycle;
pub mod lot;
pub mod parking_error;
pub mod parking_service;
pub mod ports;
pub mod slot;
pub mod trace_id;

pub use self::account::{Car, USER_NAME_MAX, User, UserValidationError};
pub use self::account_service::AccountService;
pub use self::allocator::{AllocationPolicy, DEFAULT_ALLOCATION_ATTEMPTS, SlotAllocator};
pub use self::billing::{Billing, BillingPolicy, DEFAULT_HOURLY_RATE};
pub use self::error::{Error, ErrorCode};
pub use self::history::{DailyHistory, DayUsage, HistoryAggregator, UsageIncrement, day_of};
pub use self::ids::{CarId, IdParseError, LotId, SlotId, UserId};
pub use self::lifecycle::{SlotTransition, TransitionConflict};
pub use self::lot::{Lot, LotValidationError, MAX_SLOTS_PER_LOT};
pub use self::parking_error::{Entity, ParkingError};
pub use self::parking_service::{ParkingPolicies, ParkingService};
pub use self::slot::{RelativeSlotId, Slot, SlotInvariantError, SlotRecord, SlotState};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
