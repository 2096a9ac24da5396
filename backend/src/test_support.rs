//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled only for tests or with the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{AccountCommand, CreateLotRequest, CreatedLot, ParkingCommand};
use crate::domain::{
    AccountService, Car, ParkingError, ParkingPolicies, ParkingService,
};
use crate::outbound::memory::InMemoryParkingStore;

/// Clock whose time only moves when a test advances it.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    /// Jump to an absolute instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Parking service wired to one in-memory store.
pub type InMemoryParkingService = ParkingService<
    InMemoryParkingStore,
    InMemoryParkingStore,
    InMemoryParkingStore,
    InMemoryParkingStore,
>;

/// Services and store sharing one in-memory state and one clock.
pub struct ParkingHarness {
    /// Shared backing store.
    pub store: Arc<InMemoryParkingStore>,
    /// Controllable clock.
    pub clock: Arc<MutableClock>,
    /// Parking service under test.
    pub parking: Arc<InMemoryParkingService>,
    /// Account service under test.
    pub accounts: Arc<AccountService<InMemoryParkingStore>>,
}

impl ParkingHarness {
    /// Build a harness starting at `now` with `policies`.
    pub fn new(now: DateTime<Utc>, policies: ParkingPolicies) -> Self {
        let store = Arc::new(InMemoryParkingStore::new());
        let clock = Arc::new(MutableClock::new(now));
        let parking = Arc::new(ParkingService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            clock.clone(),
            policies,
        ));
        let accounts = Arc::new(AccountService::new(store.clone()));
        Self {
            store,
            clock,
            parking,
            accounts,
        }
    }

    /// Create a lot with `slot_count` slots.
    pub async fn lot(&self, slot_count: u32) -> Result<CreatedLot, ParkingError> {
        self.parking
            .create_lot(CreateLotRequest {
                location: "Test lot".to_owned(),
                slot_count,
            })
            .await
    }

    /// Register a user owning one fresh car.
    pub async fn car(&self) -> Result<Car, ParkingError> {
        let user = self.accounts.create_user("Driver".to_owned()).await?;
        self.accounts.create_car(user.id()).await
    }
}
