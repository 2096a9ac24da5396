//! Builders for HTTP state from the configured storage backend.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use parking_backend::domain::ports::{
    AccountCommand, AccountRepository, LotRepository, ParkingCommand, ParkingHistoryRepository,
    ParkingQuery, SlotTransitionRepository,
};
use parking_backend::domain::{AccountService, ParkingPolicies, ParkingService};
use parking_backend::inbound::http::state::HttpState;
use parking_backend::outbound::memory::InMemoryParkingStore;
use parking_backend::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselLotRepository, DieselParkingHistoryRepository,
    DieselSlotTransitionRepository,
};

use super::ServerConfig;

/// Wire the services over one set of driven ports.
fn wire<L, A, T, H>(
    lots: Arc<L>,
    accounts: Arc<A>,
    transitions: Arc<T>,
    history: Arc<H>,
    policies: ParkingPolicies,
) -> HttpState
where
    L: LotRepository + 'static,
    A: AccountRepository + 'static,
    T: SlotTransitionRepository + 'static,
    H: ParkingHistoryRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let account_service: Arc<dyn AccountCommand> =
        Arc::new(AccountService::new(accounts.clone()));
    let parking = Arc::new(ParkingService::new(
        lots,
        accounts,
        transitions,
        history,
        clock,
        policies,
    ));
    let command: Arc<dyn ParkingCommand> = parking.clone();
    let query: Arc<dyn ParkingQuery> = parking;
    HttpState::new(command, query, account_service)
}

fn diesel_state(pool: &DbPool, policies: ParkingPolicies) -> HttpState {
    wire(
        Arc::new(DieselLotRepository::new(pool.clone())),
        Arc::new(DieselAccountRepository::new(pool.clone())),
        Arc::new(DieselSlotTransitionRepository::new(pool.clone())),
        Arc::new(DieselParkingHistoryRepository::new(pool.clone())),
        policies,
    )
}

fn memory_state(policies: ParkingPolicies) -> HttpState {
    let store = Arc::new(InMemoryParkingStore::new());
    wire(store.clone(), store.clone(), store.clone(), store, policies)
}

/// Build the handler state, preferring PostgreSQL when a pool is configured.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => {
            info!("serving parking data from PostgreSQL");
            diesel_state(pool, config.policies)
        }
        None => {
            info!("no database configured; serving parking data from memory");
            memory_state(config.policies)
        }
    };
    web::Data::new(state)
}
