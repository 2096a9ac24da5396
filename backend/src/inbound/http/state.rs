//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see the driving ports, so
//! they can be tested against mocks or the in-memory store.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, ParkingCommand, ParkingQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Lot creation and slot transitions.
    pub parking: Arc<dyn ParkingCommand>,
    /// Lot status and daily history.
    pub parking_query: Arc<dyn ParkingQuery>,
    /// User and car registration.
    pub accounts: Arc<dyn AccountCommand>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        parking: Arc<dyn ParkingCommand>,
        parking_query: Arc<dyn ParkingQuery>,
        accounts: Arc<dyn AccountCommand>,
    ) -> Self {
        Self {
            parking,
            parking_query,
            accounts,
        }
    }
}
