//! Server configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PARKING_*` environment variables, and an
//! optional configuration file. Numeric settings carry defaults so the
//! server starts with no configuration at all; the database URL stays
//! optional and selects the storage backend.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{AllocationPolicy, BillingPolicy, ParkingPolicies};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Configuration values for the parking server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PARKING")]
pub struct ParkingSettings {
    /// Address to bind the HTTP listener to.
    pub host: Option<IpAddr>,
    /// Port to bind the HTTP listener to.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL connection URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Price of one started hour of parking.
    #[ortho_config(default = 10)]
    pub hourly_rate: u64,
    /// Conditional-update attempts per park request.
    #[ortho_config(default = 8)]
    pub allocation_attempts: u32,
    /// Maximum number of pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
    /// Idle connections the pool keeps open.
    pub pool_min_idle: Option<u32>,
    /// Seconds a request waits for a pooled connection.
    #[ortho_config(default = 30)]
    pub pool_timeout_secs: u64,
}

impl ParkingSettings {
    /// Socket address the server listens on.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host.unwrap_or(DEFAULT_HOST), self.port)
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool configuration when a database URL is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url().map(|url| {
            let config = PoolConfig::new(url)
                .with_max_size(self.pool_max_size)
                .with_connection_timeout(Duration::from_secs(self.pool_timeout_secs));
            match self.pool_min_idle {
                Some(idle) => config.with_min_idle(Some(idle)),
                None => config,
            }
        })
    }

    /// Domain policies derived from these settings.
    pub fn policies(&self) -> ParkingPolicies {
        ParkingPolicies {
            billing: BillingPolicy::new(self.hourly_rate),
            allocation: AllocationPolicy::new(self.allocation_attempts),
        }
    }
}
