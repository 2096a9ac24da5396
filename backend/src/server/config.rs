//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use parking_backend::domain::ParkingPolicies;
use parking_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) policies: ParkingPolicies,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration backed by the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, policies: ParkingPolicies) -> Self {
        Self {
            bind_addr,
            policies,
            db_pool: None,
        }
    }

    /// Attach a database connection pool.
    ///
    /// When provided, every driven port is served by the Diesel adapters
    /// instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
