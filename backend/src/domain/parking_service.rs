//! Parking service implementing the parking driving ports.
//!
//! Park goes through the [`SlotAllocator`]. Unpark and maintenance toggles
//! compute the next slot state with the lifecycle state machine and commit it
//! once. An unpark commit carries its history increment, so a failed commit
//! leaves the car parked. Losing a race is reported as the conflict that
//! invalidated the request rather than retried.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use tracing::{error, info};

use super::allocator::{AllocationPolicy, SlotAllocator};
use super::billing::BillingPolicy;
use super::history::HistoryAggregator;
use super::ids::{CarId, LotId, SlotId};
use super::lifecycle::{SlotTransition, TransitionConflict};
use super::lot::Lot;
use super::parking_error::{Entity, ParkingError};
use super::ports::{
    AccountRepository, CommitOutcome, CreateLotRequest, CreatedLot, LotRepository,
    ParkCarRequest, ParkingCommand, ParkingHistoryRepository, ParkingQuery,
    SetMaintenanceRequest, SlotCommit, SlotStatus, SlotTransitionRepository, StorageError,
    UnparkReceipt,
};
use super::slot::Slot;
use super::{Car, DailyHistory, DayUsage};

/// Tunable policies for the parking service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParkingPolicies {
    /// Pricing applied on unpark.
    pub billing: BillingPolicy,
    /// Retry bound for slot allocation.
    pub allocation: AllocationPolicy,
}

/// Parking service over the driven storage ports.
pub struct ParkingService<L, A, T, H> {
    lots: Arc<L>,
    accounts: Arc<A>,
    transitions: Arc<T>,
    allocator: SlotAllocator<L, T>,
    aggregator: HistoryAggregator<H>,
    billing: BillingPolicy,
    clock: Arc<dyn Clock>,
}

impl<L, A, T, H> ParkingService<L, A, T, H> {
    /// Create the service.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use parking_backend::domain::{ParkingPolicies, ParkingService};
    /// # use parking_backend::outbound::memory::InMemoryParkingStore;
    /// let store = Arc::new(InMemoryParkingStore::default());
    /// let service = ParkingService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     store.clone(),
    ///     store,
    ///     Arc::new(DefaultClock),
    ///     ParkingPolicies::default(),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        lots: Arc<L>,
        accounts: Arc<A>,
        transitions: Arc<T>,
        history: Arc<H>,
        clock: Arc<dyn Clock>,
        policies: ParkingPolicies,
    ) -> Self {
        Self {
            allocator: SlotAllocator::new(lots.clone(), transitions.clone(), policies.allocation),
            aggregator: HistoryAggregator::new(history),
            lots,
            accounts,
            transitions,
            billing: policies.billing,
            clock,
        }
    }
}

impl<L, A, T, H> ParkingService<L, A, T, H>
where
    L: LotRepository,
    A: AccountRepository,
    T: SlotTransitionRepository,
    H: ParkingHistoryRepository,
{
    async fn load_car(&self, car_id: CarId) -> Result<Car, ParkingError> {
        self.accounts
            .find_car(&car_id)
            .await?
            .ok_or_else(|| ParkingError::not_found(Entity::Car, car_id))
    }

    async fn load_slot(&self, slot_id: SlotId) -> Result<Slot, ParkingError> {
        self.lots
            .find_slot(&slot_id)
            .await?
            .ok_or_else(|| ParkingError::not_found(Entity::Slot, slot_id))
    }

    async fn ensure_lot(&self, lot_id: LotId) -> Result<Lot, ParkingError> {
        self.lots
            .find_lot(&lot_id)
            .await?
            .ok_or_else(|| ParkingError::not_found(Entity::Lot, lot_id))
    }

    /// Explain a lost maintenance race from the slot's current state.
    async fn maintenance_conflict(
        &self,
        slot_id: SlotId,
        transition: SlotTransition,
    ) -> ParkingError {
        let fallback = match transition {
            SlotTransition::TakeOutOfMaintenance => TransitionConflict::NotInMaintenance,
            _ => TransitionConflict::AlreadyBooked,
        };
        match self.load_slot(slot_id).await {
            Ok(current) => current
                .apply(transition)
                .err()
                .unwrap_or(fallback)
                .into(),
            Err(err) => err,
        }
    }
}

#[async_trait]
impl<L, A, T, H> ParkingCommand for ParkingService<L, A, T, H>
where
    L: LotRepository,
    A: AccountRepository,
    T: SlotTransitionRepository,
    H: ParkingHistoryRepository,
{
    async fn create_lot(&self, request: CreateLotRequest) -> Result<CreatedLot, ParkingError> {
        let lot = Lot::new(
            LotId::random(),
            request.location,
            request.slot_count,
            self.clock.utc(),
        )?;
        let slots = lot.initial_slots();
        self.lots.create_lot(&lot, &slots).await?;
        info!(lot_id = %lot.id(), slots = lot.slot_count(), "parking lot created");
        Ok(CreatedLot { lot, slots })
    }

    async fn park_car(&self, request: ParkCarRequest) -> Result<Slot, ParkingError> {
        let ParkCarRequest { lot_id, car_id } = request;
        self.ensure_lot(lot_id).await?;
        self.load_car(car_id).await?.ensure_unparked()?;

        let slot = self
            .allocator
            .allocate(lot_id, car_id, self.clock.utc())
            .await?;
        info!(
            %lot_id,
            %car_id,
            slot_id = %slot.id(),
            relative_id = %slot.relative_id(),
            "car parked"
        );
        Ok(slot)
    }

    async fn unpark_car(&self, car_id: CarId) -> Result<UnparkReceipt, ParkingError> {
        let slot_id = self.load_car(car_id).await?.parked_slot()?;
        let current = self.lots.find_slot(&slot_id).await?.ok_or_else(|| {
            StorageError::corrupt(format!("car {car_id} references missing slot {slot_id}"))
        })?;
        let parked_at = current
            .parked_at()
            .ok_or(TransitionConflict::AlreadyUnparked)?;

        let now = self.clock.utc();
        let next = current.apply(SlotTransition::Unpark { car_id, at: now })?;
        let billing = self.billing.bill(parked_at, now);
        let usage = DayUsage::for_unpark(now, billing);
        let commit = SlotCommit::unpark(&current, next, car_id, usage);
        let outcome = self.transitions.apply(&commit).await.inspect_err(|err| {
            error!(
                %car_id,
                %slot_id,
                kind = err.kind(),
                error = %err,
                "unpark not committed; car stays parked"
            );
        })?;
        match outcome {
            CommitOutcome::Applied => {}
            CommitOutcome::StaleSlot | CommitOutcome::StaleCar => {
                return Err(TransitionConflict::AlreadyUnparked.into());
            }
        }

        info!(
            day = %usage.day,
            %car_id,
            %slot_id,
            hours = billing.duration_hours(),
            amount = billing.amount(),
            "car unparked"
        );
        Ok(UnparkReceipt {
            slot_id,
            duration_hours: billing.duration_hours(),
            amount: billing.amount(),
            unparked_at: now,
        })
    }

    async fn set_maintenance(
        &self,
        request: SetMaintenanceRequest,
    ) -> Result<Slot, ParkingError> {
        let SetMaintenanceRequest { slot_id, enabled } = request;
        let current = self.load_slot(slot_id).await?;
        let transition = SlotTransition::maintenance(enabled);
        let next = current.apply(transition)?;

        let commit = SlotCommit::maintenance(&current, next.clone());
        match self.transitions.apply(&commit).await? {
            CommitOutcome::Applied => {
                info!(%slot_id, enabled, "slot maintenance updated");
                Ok(next)
            }
            CommitOutcome::StaleSlot | CommitOutcome::StaleCar => {
                Err(self.maintenance_conflict(slot_id, transition).await)
            }
        }
    }
}

#[async_trait]
impl<L, A, T, H> ParkingQuery for ParkingService<L, A, T, H>
where
    L: LotRepository,
    A: AccountRepository,
    T: SlotTransitionRepository,
    H: ParkingHistoryRepository,
{
    async fn lot_status(&self, lot_id: LotId) -> Result<Vec<SlotStatus>, ParkingError> {
        self.ensure_lot(lot_id).await?;
        let slots = self.lots.list_slots(&lot_id).await?;
        Ok(slots.iter().map(SlotStatus::from).collect())
    }

    async fn history(&self, day: NaiveDate) -> Result<DailyHistory, ParkingError> {
        Ok(self.aggregator.history(day).await?)
    }
}

#[cfg(test)]
#[path = "parking_service_tests.rs"]
mod tests;
