//! Failure type shared by every driven storage port.

use super::define_port_error;

define_port_error! {
    /// Errors raised by storage adapters.
    pub enum StorageError {
        /// The store could not be reached.
        Connection { message: String } =>
            "parking store connection failed: {message}",
        /// A query or mutation failed during execution.
        Query { message: String } =>
            "parking store query failed: {message}",
        /// Stored data violates a domain invariant.
        Corrupt { message: String } =>
            "parking store returned inconsistent data: {message}",
    }
}

impl StorageError {
    /// Whether the failure is transient connectivity rather than a bad query.
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}
