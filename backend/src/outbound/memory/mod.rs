//! In-process parking store.
//!
//! Implements every driven storage port over one mutex-guarded state. Each
//! port call takes the lock once, so every call is atomic with respect to
//! every other, which gives the same guarantees the PostgreSQL adapters get
//! from transactions and conditional updates. Used by tests and by the
//! server when no database URL is configured.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    AccountRepository, CommitOutcome, LotRepository, ParkingHistoryRepository, SlotCommit,
    SlotTransitionRepository, StorageError,
};
use crate::domain::{
    Car, CarId, DailyHistory, DayUsage, Lot, LotId, Slot, SlotId, User, UserId,
};

#[derive(Debug, Default)]
struct MemoryState {
    lots: HashMap<LotId, Lot>,
    slots: HashMap<SlotId, Slot>,
    /// Ordered `(lot, relative id)` index used for the free-slot scan.
    slot_index: BTreeMap<(LotId, u32), SlotId>,
    users: HashMap<UserId, User>,
    cars: HashMap<CarId, Car>,
    history: BTreeMap<NaiveDate, DailyHistory>,
}

impl MemoryState {
    fn lot_slots(&self, lot_id: LotId) -> impl Iterator<Item = &Slot> + '_ {
        self.slot_index
            .range((lot_id, u32::MIN)..=(lot_id, u32::MAX))
            .filter_map(|(_, slot_id)| self.slots.get(slot_id))
    }

    fn credit(&mut self, usage: DayUsage) {
        let totals = self
            .history
            .entry(usage.day)
            .or_insert_with(|| DailyHistory::empty(usage.day));
        *totals = totals.plus(usage.increment);
    }
}

/// Parking store kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryParkingStore {
    state: Mutex<MemoryState>,
}

impl InMemoryParkingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LotRepository for InMemoryParkingStore {
    async fn create_lot(&self, lot: &Lot, slots: &[Slot]) -> Result<(), StorageError> {
        let mut state = self.lock();
        if state.lots.contains_key(&lot.id()) {
            return Err(StorageError::query(format!("lot {} already exists", lot.id())));
        }
        let mut seen = HashSet::with_capacity(slots.len());
        for slot in slots {
            let key = (lot.id(), slot.relative_id().get());
            if slot.lot_id() != lot.id()
                || !seen.insert(key)
                || state.slots.contains_key(&slot.id())
                || state.slot_index.contains_key(&key)
            {
                return Err(StorageError::query(format!(
                    "slot {} conflicts with an existing slot",
                    slot.id()
                )));
            }
        }

        state.lots.insert(lot.id(), lot.clone());
        for slot in slots {
            state
                .slot_index
                .insert((lot.id(), slot.relative_id().get()), slot.id());
            state.slots.insert(slot.id(), slot.clone());
        }
        Ok(())
    }

    async fn find_lot(&self, lot_id: &LotId) -> Result<Option<Lot>, StorageError> {
        Ok(self.lock().lots.get(lot_id).cloned())
    }

    async fn list_slots(&self, lot_id: &LotId) -> Result<Vec<Slot>, StorageError> {
        Ok(self.lock().lot_slots(*lot_id).cloned().collect())
    }

    async fn find_slot(&self, slot_id: &SlotId) -> Result<Option<Slot>, StorageError> {
        Ok(self.lock().slots.get(slot_id).cloned())
    }

    async fn find_first_free_slot(&self, lot_id: &LotId) -> Result<Option<Slot>, StorageError> {
        Ok(self
            .lock()
            .lot_slots(*lot_id)
            .find(|slot| !slot.is_booked())
            .cloned())
    }
}

#[async_trait]
impl AccountRepository for InMemoryParkingStore {
    async fn create_user(&self, user: &User) -> Result<(), StorageError> {
        let mut state = self.lock();
        if state.users.contains_key(&user.id()) {
            return Err(StorageError::query(format!("user {} already exists", user.id())));
        }
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_user(&self, user_id: &UserId) -> Result<Option<User>, StorageError> {
        Ok(self.lock().users.get(user_id).cloned())
    }

    async fn create_car(&self, car: &Car) -> Result<(), StorageError> {
        let mut state = self.lock();
        if !state.users.contains_key(&car.user_id()) {
            return Err(StorageError::query(format!(
                "car {} references unknown user {}",
                car.id(),
                car.user_id()
            )));
        }
        if state.cars.contains_key(&car.id()) {
            return Err(StorageError::query(format!("car {} already exists", car.id())));
        }
        state.cars.insert(car.id(), *car);
        Ok(())
    }

    async fn find_car(&self, car_id: &CarId) -> Result<Option<Car>, StorageError> {
        Ok(self.lock().cars.get(car_id).copied())
    }
}

#[async_trait]
impl SlotTransitionRepository for InMemoryParkingStore {
    async fn apply(&self, commit: &SlotCommit) -> Result<CommitOutcome, StorageError> {
        let mut state = self.lock();
        let slot_id = commit.slot.id();
        let Some(stored) = state.slots.get(&slot_id) else {
            return Err(StorageError::query(format!("slot {slot_id} does not exist")));
        };
        if stored.revision() != commit.expected_revision {
            return Ok(CommitOutcome::StaleSlot);
        }

        let next_car = match commit.car {
            Some(link) => match state.cars.get(&link.car_id) {
                Some(car) if car.slot_id() == link.expected_slot => Some(Car::from_parts(
                    car.id(),
                    car.user_id(),
                    link.next_slot,
                )),
                _ => return Ok(CommitOutcome::StaleCar),
            },
            None => None,
        };

        state.slots.insert(slot_id, commit.slot.clone());
        if let Some(car) = next_car {
            state.cars.insert(car.id(), car);
        }
        if let Some(usage) = commit.usage {
            state.credit(usage);
        }
        Ok(CommitOutcome::Applied)
    }
}

#[async_trait]
impl ParkingHistoryRepository for InMemoryParkingStore {
    async fn find_by_day(&self, day: NaiveDate) -> Result<Option<DailyHistory>, StorageError> {
        Ok(self.lock().history.get(&day).copied())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
