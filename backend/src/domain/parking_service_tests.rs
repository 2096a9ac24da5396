//! Behavioural coverage for the parking service.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, TimeDelta, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{AccountService, UsageIncrement};
use crate::domain::ports::{
    AccountCommand, MockLotRepository, MockSlotTransitionRepository, SlotTransitionRepository,
};
use crate::outbound::memory::InMemoryParkingStore;
use crate::test_support::{MutableClock, ParkingHarness};

fn start() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-05-01T08:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

#[fixture]
fn harness() -> ParkingHarness {
    ParkingHarness::new(start(), ParkingPolicies::default())
}

async fn park(harness: &ParkingHarness, lot_id: LotId, car_id: CarId) -> Result<Slot, ParkingError> {
    harness
        .parking
        .park_car(ParkCarRequest { lot_id, car_id })
        .await
}

#[rstest]
#[tokio::test]
async fn create_lot_numbers_slots_from_one(harness: ParkingHarness) {
    let created = harness.lot(3).await.expect("lot created");

    let relative: Vec<u32> = created
        .slots
        .iter()
        .map(|slot| slot.relative_id().get())
        .collect();
    assert_eq!(relative, vec![1, 2, 3]);
    assert_eq!(created.lot.slot_count(), 3);
}

#[rstest]
#[tokio::test]
async fn create_lot_with_zero_slots_persists_nothing() {
    let mut lots = MockLotRepository::new();
    lots.expect_create_lot().never();
    let store = Arc::new(InMemoryParkingStore::new());
    let service = ParkingService::new(
        Arc::new(lots),
        store.clone(),
        store.clone(),
        store,
        Arc::new(MutableClock::new(start())),
        ParkingPolicies::default(),
    );

    let err = service
        .create_lot(CreateLotRequest {
            location: "Depot".to_owned(),
            slot_count: 0,
        })
        .await
        .expect_err("zero slots rejected");

    assert!(matches!(err, ParkingError::Validation { .. }));
}

#[rstest]
#[tokio::test]
async fn park_takes_lowest_free_slot(harness: ParkingHarness) {
    let created = harness.lot(3).await.expect("lot created");
    let lot_id = created.lot.id();
    let first = harness.car().await.expect("car");
    let second = harness.car().await.expect("car");

    let a = park(&harness, lot_id, first.id()).await.expect("first park");
    let b = park(&harness, lot_id, second.id()).await.expect("second park");

    assert_eq!(a.relative_id().get(), 1);
    assert_eq!(b.relative_id().get(), 2);
    assert_eq!(a.parked_at(), Some(start()));
    let stored = harness
        .store
        .find_car(&first.id())
        .await
        .expect("lookup")
        .expect("car");
    assert_eq!(stored.slot_id(), Some(a.id()));
}

#[rstest]
#[tokio::test]
async fn park_skips_slots_in_maintenance(harness: ParkingHarness) {
    let created = harness.lot(2).await.expect("lot created");
    let first_slot = created.slots.first().expect("slot 1").id();
    harness
        .parking
        .set_maintenance(SetMaintenanceRequest {
            slot_id: first_slot,
            enabled: true,
        })
        .await
        .expect("maintenance on");
    let car = harness.car().await.expect("car");

    let slot = park(&harness, created.lot.id(), car.id()).await.expect("park");

    assert_eq!(slot.relative_id().get(), 2);
}

#[rstest]
#[tokio::test]
async fn park_twice_fails_already_parked(harness: ParkingHarness) {
    let created = harness.lot(2).await.expect("lot created");
    let car = harness.car().await.expect("car");
    park(&harness, created.lot.id(), car.id()).await.expect("first park");

    let err = park(&harness, created.lot.id(), car.id())
        .await
        .expect_err("second park refused");

    assert_eq!(err, ParkingError::Conflict(TransitionConflict::AlreadyParked));
    let status = harness
        .parking
        .lot_status(created.lot.id())
        .await
        .expect("status");
    assert_eq!(status.iter().filter(|s| s.is_booked).count(), 1);
}

#[rstest]
#[tokio::test]
async fn park_in_full_lot_is_exhausted_and_mutates_nothing(harness: ParkingHarness) {
    let created = harness.lot(1).await.expect("lot created");
    let lot_id = created.lot.id();
    let occupant = harness.car().await.expect("car");
    park(&harness, lot_id, occupant.id()).await.expect("park");
    let before = harness.parking.lot_status(lot_id).await.expect("status");
    let late = harness.car().await.expect("car");

    let err = park(&harness, lot_id, late.id()).await.expect_err("lot full");

    assert!(matches!(err, ParkingError::ResourceExhausted { .. }));
    assert_eq!(harness.parking.lot_status(lot_id).await.expect("status"), before);
    let stored = harness
        .store
        .find_car(&late.id())
        .await
        .expect("lookup")
        .expect("car");
    assert!(stored.slot_id().is_none());
}

#[rstest]
#[tokio::test]
async fn park_reports_missing_lot_and_car(harness: ParkingHarness) {
    let created = harness.lot(1).await.expect("lot created");
    let car = harness.car().await.expect("car");
    let missing_lot = LotId::random();
    let missing_car = CarId::random();

    let lot_err = park(&harness, missing_lot, car.id()).await.expect_err("no lot");
    let car_err = park(&harness, created.lot.id(), missing_car)
        .await
        .expect_err("no car");

    assert_eq!(lot_err, ParkingError::not_found(Entity::Lot, missing_lot));
    assert_eq!(car_err, ParkingError::not_found(Entity::Car, missing_car));
}

#[rstest]
#[tokio::test]
async fn unpark_bills_started_hours_and_records_history(harness: ParkingHarness) {
    let created = harness.lot(1).await.expect("lot created");
    let car = harness.car().await.expect("car");
    let slot = park(&harness, created.lot.id(), car.id()).await.expect("park");
    harness.clock.advance(TimeDelta::minutes(110));

    let receipt = harness.parking.unpark_car(car.id()).await.expect("unpark");

    assert_eq!(receipt.duration_hours, 2);
    assert_eq!(receipt.amount, 20);
    assert_eq!(receipt.slot_id, slot.id());
    let history = harness
        .parking
        .history(start().date_naive())
        .await
        .expect("history");
    assert_eq!(history, DailyHistory::new(start().date_naive(), 1, 2, 20));
    let freed = harness
        .store
        .find_slot(&slot.id())
        .await
        .expect("lookup")
        .expect("slot");
    assert!(!freed.is_booked());
    assert_eq!(freed.unparked_at(), Some(start() + TimeDelta::minutes(110)));
}

#[rstest]
#[tokio::test]
async fn unpark_uses_configured_rate() {
    let harness = ParkingHarness::new(
        start(),
        ParkingPolicies {
            billing: BillingPolicy::new(7),
            ..ParkingPolicies::default()
        },
    );
    let created = harness.lot(1).await.expect("lot created");
    let car = harness.car().await.expect("car");
    park(&harness, created.lot.id(), car.id()).await.expect("park");
    harness.clock.advance(TimeDelta::minutes(181));

    let receipt = harness.parking.unpark_car(car.id()).await.expect("unpark");

    assert_eq!((receipt.duration_hours, receipt.amount), (4, 28));
}

#[rstest]
#[tokio::test]
async fn unpark_twice_fails_and_leaves_history_unchanged(harness: ParkingHarness) {
    let created = harness.lot(1).await.expect("lot created");
    let car = harness.car().await.expect("car");
    park(&harness, created.lot.id(), car.id()).await.expect("park");
    harness.clock.advance(TimeDelta::minutes(30));
    harness.parking.unpark_car(car.id()).await.expect("unpark");
    let before = harness
        .parking
        .history(start().date_naive())
        .await
        .expect("history");

    let err = harness
        .parking
        .unpark_car(car.id())
        .await
        .expect_err("already unparked");

    assert_eq!(err, ParkingError::Conflict(TransitionConflict::AlreadyUnparked));
    let after = harness
        .parking
        .history(start().date_naive())
        .await
        .expect("history");
    assert_eq!(before, after);
}

#[rstest]
#[tokio::test]
async fn unpark_unknown_car_is_not_found(harness: ParkingHarness) {
    let car_id = CarId::random();
    let err = harness
        .parking
        .unpark_car(car_id)
        .await
        .expect_err("unknown car");
    assert_eq!(err, ParkingError::not_found(Entity::Car, car_id));
}

/// Fails the first commit that carries usage, then defers to the store.
struct FlakyUnparkCommits {
    store: Arc<InMemoryParkingStore>,
    failed: AtomicBool,
}

#[async_trait]
impl SlotTransitionRepository for FlakyUnparkCommits {
    async fn apply(&self, commit: &SlotCommit) -> Result<CommitOutcome, StorageError> {
        if commit.usage.is_some() && !self.failed.swap(true, Ordering::SeqCst) {
            return Err(StorageError::connection("history down"));
        }
        self.store.apply(commit).await
    }
}

#[rstest]
#[tokio::test]
async fn failed_unpark_commit_keeps_car_parked_and_can_retry() {
    let store = Arc::new(InMemoryParkingStore::new());
    let transitions = Arc::new(FlakyUnparkCommits {
        store: store.clone(),
        failed: AtomicBool::new(false),
    });
    let clock = Arc::new(MutableClock::new(start()));
    let service = ParkingService::new(
        store.clone(),
        store.clone(),
        transitions,
        store.clone(),
        clock.clone(),
        ParkingPolicies::default(),
    );
    let accounts = AccountService::new(store.clone());
    let user = accounts.create_user("Ada".to_owned()).await.expect("user");
    let car = accounts.create_car(user.id()).await.expect("car");
    let lot = service
        .create_lot(CreateLotRequest {
            location: "Depot".to_owned(),
            slot_count: 1,
        })
        .await
        .expect("lot");
    let slot = service
        .park_car(ParkCarRequest {
            lot_id: lot.lot.id(),
            car_id: car.id(),
        })
        .await
        .expect("park");
    clock.advance(TimeDelta::hours(1));

    let err = service.unpark_car(car.id()).await.expect_err("commit fails");

    assert_eq!(err, ParkingError::Storage(StorageError::connection("history down")));
    let stored = store.find_car(&car.id()).await.expect("lookup").expect("car");
    assert_eq!(stored.slot_id(), Some(slot.id()));
    let day = start().date_naive();
    assert_eq!(service.history(day).await.expect("history"), DailyHistory::empty(day));

    let receipt = service.unpark_car(car.id()).await.expect("retry succeeds");

    assert_eq!((receipt.duration_hours, receipt.amount), (1, 10));
    assert_eq!(
        service.history(day).await.expect("history"),
        DailyHistory::new(day, 1, 1, 10)
    );
}

#[rstest]
#[tokio::test]
async fn unpark_commit_carries_usage_for_the_day() {
    let store = Arc::new(InMemoryParkingStore::new());
    let lot = Lot::new(LotId::random(), "Depot", 1, start()).expect("valid lot");
    let slots = lot.initial_slots();
    store.create_lot(&lot, &slots).await.expect("lot");
    let accounts = AccountService::new(store.clone());
    let user = accounts.create_user("Ada".to_owned()).await.expect("user");
    let car = accounts.create_car(user.id()).await.expect("car");
    let slot = slots.first().expect("slot 1").clone();
    let parked = slot
        .apply(SlotTransition::Park {
            car_id: car.id(),
            at: start(),
        })
        .expect("park succeeds");
    store
        .apply(&SlotCommit::park(&slot, parked, car.id()))
        .await
        .expect("park commits");

    let mut transitions = MockSlotTransitionRepository::new();
    transitions
        .expect_apply()
        .withf(|commit| {
            commit.usage
                == Some(DayUsage {
                    day: start().date_naive(),
                    increment: UsageIncrement {
                        cars: 1,
                        hours: 3,
                        revenue: 30,
                    },
                })
        })
        .times(1)
        .return_once(|_| Ok(CommitOutcome::Applied));
    let clock = Arc::new(MutableClock::new(start() + TimeDelta::minutes(150)));
    let service = ParkingService::new(
        store.clone(),
        store.clone(),
        Arc::new(transitions),
        store,
        clock,
        ParkingPolicies::default(),
    );

    let receipt = service.unpark_car(car.id()).await.expect("unpark");

    assert_eq!(receipt.amount, 30);
}

#[rstest]
#[tokio::test]
async fn maintenance_round_trip_has_no_side_effects(harness: ParkingHarness) {
    let created = harness.lot(3).await.expect("lot created");
    let lot_id = created.lot.id();
    let target = created.slots.get(1).expect("slot 2").id();
    let before = harness.parking.lot_status(lot_id).await.expect("status");

    let held = harness
        .parking
        .set_maintenance(SetMaintenanceRequest {
            slot_id: target,
            enabled: true,
        })
        .await
        .expect("maintenance on");
    assert!(held.is_in_maintenance() && held.is_booked());
    harness
        .parking
        .set_maintenance(SetMaintenanceRequest {
            slot_id: target,
            enabled: false,
        })
        .await
        .expect("maintenance off");

    assert_eq!(harness.parking.lot_status(lot_id).await.expect("status"), before);
    let history = harness
        .parking
        .history(start().date_naive())
        .await
        .expect("history");
    assert_eq!(history, DailyHistory::empty(start().date_naive()));
}

#[rstest]
#[case(true, TransitionConflict::AlreadyBooked)]
#[case(false, TransitionConflict::AlreadyBooked)]
#[tokio::test]
async fn maintenance_on_occupied_slot_is_refused(
    harness: ParkingHarness,
    #[case] enabled: bool,
    #[case] expected: TransitionConflict,
) {
    let created = harness.lot(1).await.expect("lot created");
    let car = harness.car().await.expect("car");
    let slot = park(&harness, created.lot.id(), car.id()).await.expect("park");

    let err = harness
        .parking
        .set_maintenance(SetMaintenanceRequest {
            slot_id: slot.id(),
            enabled,
        })
        .await
        .expect_err("occupied slot");

    assert_eq!(err, ParkingError::Conflict(expected));
}

#[rstest]
#[tokio::test]
async fn maintenance_toggles_report_state_conflicts(harness: ParkingHarness) {
    let created = harness.lot(1).await.expect("lot created");
    let slot_id = created.slots.first().expect("slot 1").id();
    let toggle = |enabled| SetMaintenanceRequest { slot_id, enabled };

    let not_in = harness
        .parking
        .set_maintenance(toggle(false))
        .await
        .expect_err("not in maintenance");
    harness
        .parking
        .set_maintenance(toggle(true))
        .await
        .expect("maintenance on");
    let already = harness
        .parking
        .set_maintenance(toggle(true))
        .await
        .expect_err("already in maintenance");

    assert_eq!(not_in, ParkingError::Conflict(TransitionConflict::NotInMaintenance));
    assert_eq!(
        already,
        ParkingError::Conflict(TransitionConflict::AlreadyInMaintenance)
    );
}

#[rstest]
#[tokio::test]
async fn maintenance_on_unknown_slot_is_not_found(harness: ParkingHarness) {
    let slot_id = SlotId::random();
    let err = harness
        .parking
        .set_maintenance(SetMaintenanceRequest {
            slot_id,
            enabled: true,
        })
        .await
        .expect_err("unknown slot");
    assert_eq!(err, ParkingError::not_found(Entity::Slot, slot_id));
}

#[rstest]
#[tokio::test]
async fn lost_maintenance_race_reports_current_state() {
    let store = Arc::new(InMemoryParkingStore::new());
    let lot = Lot::new(LotId::random(), "Depot", 1, start()).expect("valid lot");
    let slots = lot.initial_slots();
    store.create_lot(&lot, &slots).await.expect("lot");
    let slot = slots.first().expect("slot 1").clone();
    let held = slot
        .apply(SlotTransition::PutInMaintenance)
        .expect("maintenance succeeds");
    store
        .apply(&SlotCommit::maintenance(&slot, held))
        .await
        .expect("concurrent commit");

    let mut transitions = MockSlotTransitionRepository::new();
    transitions
        .expect_apply()
        .times(1)
        .return_once(|_| Ok(CommitOutcome::StaleSlot));
    let mut lots = MockLotRepository::new();
    let mut reads = vec![store.find_slot(&slot.id()).await.expect("read"), Some(slot.clone())];
    lots.expect_find_slot()
        .times(2)
        .returning(move |_| Ok(reads.pop().flatten()));
    let service = ParkingService::new(
        Arc::new(lots),
        store.clone(),
        Arc::new(transitions),
        store,
        Arc::new(MutableClock::new(start())),
        ParkingPolicies::default(),
    );

    let err = service
        .set_maintenance(SetMaintenanceRequest {
            slot_id: slot.id(),
            enabled: true,
        })
        .await
        .expect_err("lost race");

    assert_eq!(
        err,
        ParkingError::Conflict(TransitionConflict::AlreadyInMaintenance)
    );
}

#[rstest]
#[tokio::test]
async fn lot_status_lists_slots_in_order_with_cars(harness: ParkingHarness) {
    let created = harness.lot(3).await.expect("lot created");
    let lot_id = created.lot.id();
    let car = harness.car().await.expect("car");
    park(&harness, lot_id, car.id()).await.expect("park");

    let status = harness.parking.lot_status(lot_id).await.expect("status");

    let relative: Vec<u32> = status.iter().map(|s| s.relative_id).collect();
    assert_eq!(relative, vec![1, 2, 3]);
    let first = status.first().expect("slot 1");
    assert!(first.is_booked && !first.is_in_maintenance);
    assert_eq!(first.car_id, Some(car.id()));
    assert!(status.iter().skip(1).all(|s| s.car_id.is_none() && !s.is_booked));
}

#[rstest]
#[tokio::test]
async fn lot_status_of_unknown_lot_is_not_found(harness: ParkingHarness) {
    let lot_id = LotId::random();
    let err = harness
        .parking
        .lot_status(lot_id)
        .await
        .expect_err("unknown lot");
    assert_eq!(err, ParkingError::not_found(Entity::Lot, lot_id));
}

#[rstest]
#[tokio::test]
async fn history_of_quiet_day_is_zeroed(harness: ParkingHarness) {
    let day = start().date_naive();
    let history = harness.parking.history(day).await.expect("history");
    assert_eq!(history, DailyHistory::empty(day));
}
