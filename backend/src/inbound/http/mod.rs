//! HTTP inbound adapter exposing the parking REST endpoints.
//!
//! Every endpoint lives under `/api/v1`; health probes are mounted
//! separately by the server.

use actix_web::web;

pub mod accounts;
pub mod error;
pub mod health;
pub mod history;
pub mod lots;
pub mod parking;
pub mod schemas;
pub mod slots;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Versioned API scope with every parking endpoint registered.
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api/v1")
        .app_data(validation::json_config())
        .service(accounts::create_user)
        .service(accounts::create_car)
        .service(lots::create_lot)
        .service(lots::lot_status)
        .service(parking::park_car)
        .service(parking::unpark_car)
        .service(slots::set_maintenance)
        .service(history::get_history)
}
