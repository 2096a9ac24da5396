//! Outbound adapters implementing the driven storage ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel and `bb8`.
//! - **memory**: a single-process store used by tests and by the server when
//!   no database is configured.
//!
//! Adapters translate between domain types and storage representations and
//! contain no parking rules.

pub mod memory;
pub mod persistence;
