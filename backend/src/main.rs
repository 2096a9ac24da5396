//! Backend entry-point: loads settings, prepares storage, and serves the
//! parking REST API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use parking_backend::ParkingSettings;
use parking_backend::inbound::http::health::HealthState;
use parking_backend::outbound::persistence::{DbPool, run_migrations};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ParkingSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?;

    let mut config = ServerConfig::new(settings.bind_addr(), settings.policies());
    if let Some(pool_config) = settings.pool_config() {
        run_migrations(pool_config.database_url())
            .await
            .map_err(|e| std::io::Error::other(format!("database migrations failed: {e}")))?;
        let pool = DbPool::new(pool_config)
            .await
            .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(
        addr = %config.bind_addr(),
        hourly_rate = settings.hourly_rate,
        "starting parking server"
    );
    create_server(health_state, config)?.await
}
