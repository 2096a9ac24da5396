//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are what inbound adapters call.
//! Driven ports (`*Repository`) are what outbound adapters implement.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_repository;
mod lot_repository;
mod parking_command;
mod parking_history_repository;
mod parking_query;
mod slot_transition_repository;
mod storage_error;

pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_repository::AccountRepository;
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use lot_repository::LotRepository;
#[cfg(test)]
pub use lot_repository::MockLotRepository;
#[cfg(test)]
pub use parking_command::MockParkingCommand;
pub use parking_command::{
    CreateLotRequest, CreatedLot, ParkCarRequest, ParkingCommand, SetMaintenanceRequest,
    UnparkReceipt,
};
#[cfg(test)]
pub use parking_history_repository::MockParkingHistoryRepository;
pub use parking_history_repository::ParkingHistoryRepository;
#[cfg(test)]
pub use parking_query::MockParkingQuery;
pub use parking_query::{ParkingQuery, SlotStatus};
#[cfg(test)]
pub use slot_transition_repository::MockSlotTransitionRepository;
pub use slot_transition_repository::{
    CarLink, CommitOutcome, SlotCommit, SlotTransitionRepository,
};
pub use storage_error::StorageError;
