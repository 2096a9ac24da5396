//! Test helpers for inbound HTTP components.

use actix_web::web;
use chrono::{DateTime, Utc};

use crate::domain::ParkingPolicies;
use crate::inbound::http::state::HttpState;
use crate::test_support::ParkingHarness;

/// Fixed instant the handler tests start from.
pub fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_714_550_400, 0).unwrap_or_default()
}

/// In-memory harness with default policies.
pub fn harness() -> ParkingHarness {
    ParkingHarness::new(start(), ParkingPolicies::default())
}

/// HTTP state backed by the harness services.
pub fn state_for(harness: &ParkingHarness) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(
        harness.parking.clone(),
        harness.parking.clone(),
        harness.accounts.clone(),
    ))
}

/// Build the API app for a harness.
macro_rules! api_app {
    ($harness:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($crate::inbound::http::test_utils::state_for(&$harness))
                .wrap($crate::Trace)
                .service($crate::inbound::http::api_scope()),
        )
    };
}
pub(crate) use api_app;
