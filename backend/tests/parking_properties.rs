//! Concurrency properties of slot allocation and history aggregation.
//!
//! These run the real services over the in-memory store on a multi-threaded
//! runtime so park and unpark requests genuinely interleave.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use futures::future::join_all;
use parking_backend::domain::ports::{
    AccountRepository, ParkCarRequest, ParkingCommand, ParkingQuery,
};
use parking_backend::domain::{
    AllocationPolicy, BillingPolicy, Car, ParkingError, ParkingPolicies, day_of,
};
use parking_backend::test_support::ParkingHarness;
use rstest::rstest;

fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_714_550_400, 0).unwrap_or_default()
}

fn harness_with_attempts(attempts: u32) -> Arc<ParkingHarness> {
    Arc::new(ParkingHarness::new(
        start(),
        ParkingPolicies {
            billing: BillingPolicy::default(),
            allocation: AllocationPolicy::new(attempts),
        },
    ))
}

async fn cars(harness: &ParkingHarness, count: usize) -> Vec<Car> {
    let mut cars = Vec::with_capacity(count);
    for _ in 0..count {
        cars.push(harness.car().await.expect("car"));
    }
    cars
}

#[rstest]
#[case(8, 8)]
#[case(16, 10)]
#[case(3, 32)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_parks_never_share_a_slot(#[case] slots: u32, #[case] requests: usize) {
    let attempts = u32::try_from(requests).expect("small request count");
    let harness = harness_with_attempts(attempts.max(1));
    let lot = harness.lot(slots).await.expect("lot");
    let lot_id = lot.lot.id();
    let cars = cars(&harness, requests).await;

    let handles = cars.iter().map(|car| {
        let parking = harness.parking.clone();
        let car_id = car.id();
        tokio::spawn(async move { parking.park_car(ParkCarRequest { lot_id, car_id }).await })
    });
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .collect();

    let booked: Vec<u32> = results
        .iter()
        .filter_map(|result| result.as_ref().ok())
        .map(|slot| slot.relative_id().get())
        .collect();
    let distinct: HashSet<u32> = booked.iter().copied().collect();
    assert_eq!(distinct.len(), booked.len(), "a slot was handed out twice");

    let expected = requests.min(usize::try_from(slots).expect("slot count fits"));
    assert_eq!(booked.len(), expected);
    assert!(results.iter().all(|result| match result {
        Ok(_) => true,
        Err(err) => matches!(err, ParkingError::ResourceExhausted { .. }),
    }));

    let status = harness.parking.lot_status(lot_id).await.expect("status");
    let occupied = status.iter().filter(|slot| slot.car_id.is_some()).count();
    assert_eq!(occupied, expected);
    for car in &cars {
        let stored = harness
            .store
            .find_car(&car.id())
            .await
            .expect("lookup")
            .expect("car exists");
        let holder = status.iter().find(|slot| slot.car_id == Some(car.id()));
        assert_eq!(stored.slot_id(), holder.map(|slot| slot.slot_id));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_unparks_are_all_counted() {
    const CARS: usize = 24;
    let harness = harness_with_attempts(8);
    let lot = harness.lot(32).await.expect("lot");
    let cars = cars(&harness, CARS).await;
    for car in &cars {
        harness
            .parking
            .park_car(ParkCarRequest {
                lot_id: lot.lot.id(),
                car_id: car.id(),
            })
            .await
            .expect("park");
    }
    harness.clock.advance(TimeDelta::minutes(90));

    let handles = cars.iter().map(|car| {
        let parking = harness.parking.clone();
        let car_id = car.id();
        tokio::spawn(async move { parking.unpark_car(car_id).await })
    });
    for joined in join_all(handles).await {
        let receipt = joined.expect("task completes").expect("unpark");
        assert_eq!((receipt.duration_hours, receipt.amount), (2, 20));
    }

    let history = harness
        .parking
        .history(day_of(start()))
        .await
        .expect("history");
    let cars_parked = u64::try_from(CARS).expect("fits");
    assert_eq!(history.cars_parked(), cars_parked);
    assert_eq!(history.total_parking_time(), 2 * cars_parked);
    assert_eq!(history.total_revenue_earned(), 20 * cars_parked);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_unparks_of_one_car_bill_once() {
    let harness = harness_with_attempts(8);
    let lot = harness.lot(1).await.expect("lot");
    let car = harness.car().await.expect("car");
    harness
        .parking
        .park_car(ParkCarRequest {
            lot_id: lot.lot.id(),
            car_id: car.id(),
        })
        .await
        .expect("park");
    harness.clock.advance(TimeDelta::minutes(30));

    let handles = (0..6).map(|_| {
        let parking = harness.parking.clone();
        let car_id = car.id();
        tokio::spawn(async move { parking.unpark_car(car_id).await })
    });
    let successes = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .filter(Result::is_ok)
        .count();

    assert_eq!(successes, 1);
    let history = harness
        .parking
        .history(day_of(start()))
        .await
        .expect("history");
    assert_eq!(history.cars_parked(), 1);
}
