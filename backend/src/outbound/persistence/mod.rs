//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each repository implements one driven port and only translates between
//! rows and domain types. Row structs (`models`) and the table definitions
//! (`schema`) stay private to this module. Every database failure is mapped
//! to [`StorageError`](crate::domain::ports::StorageError) before it leaves.
//!
//! ```no_run
//! use parking_backend::outbound::persistence::{
//!     DbPool, DieselLotRepository, PoolConfig, run_migrations,
//! };
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://localhost/parking";
//! run_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let lots = DieselLotRepository::new(pool);
//! # let _ = lots;
//! # Ok(())
//! # }
//! ```

mod diesel_account_repository;
mod diesel_error_mapping;
mod diesel_lot_repository;
mod diesel_parking_history_repository;
mod diesel_slot_transition_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_lot_repository::DieselLotRepository;
pub use diesel_parking_history_repository::DieselParkingHistoryRepository;
pub use diesel_slot_transition_repository::DieselSlotTransitionRepository;
pub use migrations::{MIGRATIONS, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
