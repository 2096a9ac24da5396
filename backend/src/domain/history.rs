//! Daily usage aggregation.
//!
//! Each successful unpark adds one car, its billed hours, and its fee to the
//! record of the UTC calendar day it happened on. Records are created on the
//! first unpark of a day and only ever grow. The increment is committed in
//! the same unit as the unpark itself, so a stay is either both released
//! and counted or neither.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::error;

use super::billing::Billing;
use super::ports::{ParkingHistoryRepository, StorageError};

/// Usage totals for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyHistory {
    day: NaiveDate,
    cars_parked: u64,
    total_parking_time: u64,
    total_revenue_earned: u64,
}

impl DailyHistory {
    /// Build a record from stored totals.
    pub const fn new(
        day: NaiveDate,
        cars_parked: u64,
        total_parking_time: u64,
        total_revenue_earned: u64,
    ) -> Self {
        Self {
            day,
            cars_parked,
            total_parking_time,
            total_revenue_earned,
        }
    }

    /// Zeroed record for a day without unparks.
    pub const fn empty(day: NaiveDate) -> Self {
        Self::new(day, 0, 0, 0)
    }

    /// Calendar day.
    pub const fn day(&self) -> NaiveDate {
        self.day
    }

    /// Cars that left during the day.
    pub const fn cars_parked(&self) -> u64 {
        self.cars_parked
    }

    /// Billed hours summed over the day.
    pub const fn total_parking_time(&self) -> u64 {
        self.total_parking_time
    }

    /// Fees summed over the day.
    pub const fn total_revenue_earned(&self) -> u64 {
        self.total_revenue_earned
    }

    /// Totals after adding `increment`.
    #[must_use]
    pub const fn plus(self, increment: UsageIncrement) -> Self {
        Self {
            day: self.day,
            cars_parked: self.cars_parked.saturating_add(increment.cars),
            total_parking_time: self.total_parking_time.saturating_add(increment.hours),
            total_revenue_earned: self.total_revenue_earned.saturating_add(increment.revenue),
        }
    }
}

/// Amount added to a day's totals by one unpark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsageIncrement {
    /// Number of cars, always one for an unpark.
    pub cars: u64,
    /// Billed hours.
    pub hours: u64,
    /// Fee charged.
    pub revenue: u64,
}

impl From<Billing> for UsageIncrement {
    fn from(billing: Billing) -> Self {
        Self {
            cars: 1,
            hours: billing.duration_hours(),
            revenue: billing.amount(),
        }
    }
}

/// Calendar day an instant belongs to.
pub fn day_of(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

/// Increment credited to one day, committed together with the unpark that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayUsage {
    /// UTC calendar day of the unpark.
    pub day: NaiveDate,
    /// Totals to add.
    pub increment: UsageIncrement,
}

impl DayUsage {
    /// Usage for a stay that ended at `unparked_at`.
    pub fn for_unpark(unparked_at: DateTime<Utc>, billing: Billing) -> Self {
        Self {
            day: day_of(unparked_at),
            increment: UsageIncrement::from(billing),
        }
    }
}

/// Read side of the per-day usage counters.
///
/// Increments are written by the slot transition store in the same unit as
/// the unpark (see [`DayUsage`]); this type only resolves lookups.
#[derive(Clone)]
pub struct HistoryAggregator<H> {
    history: Arc<H>,
}

impl<H> HistoryAggregator<H> {
    /// Create an aggregator over `history`.
    pub const fn new(history: Arc<H>) -> Self {
        Self { history }
    }
}

impl<H> HistoryAggregator<H>
where
    H: ParkingHistoryRepository,
{
    /// Totals for `day`, zeroed when nothing was recorded.
    pub async fn history(&self, day: NaiveDate) -> Result<DailyHistory, StorageError> {
        let found = self.history.find_by_day(day).await.inspect_err(|err| {
            error!(%day, kind = err.kind(), error = %err, "failed to read history");
        })?;
        Ok(found.unwrap_or_else(|| DailyHistory::empty(day)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockParkingHistoryRepository;
    use mockall::predicate::eq;
    use rstest::rstest;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).expect("valid date")
    }

    #[rstest]
    fn usage_is_credited_to_the_utc_day_of_departure() {
        let unparked_at = day()
            .and_hms_opt(23, 59, 59)
            .expect("valid time")
            .and_utc();

        let usage = DayUsage::for_unpark(unparked_at, Billing::new(2, 20));

        assert_eq!(
            usage,
            DayUsage {
                day: day(),
                increment: UsageIncrement {
                    cars: 1,
                    hours: 2,
                    revenue: 20,
                },
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn history_propagates_storage_errors() {
        let mut repo = MockParkingHistoryRepository::new();
        repo.expect_find_by_day()
            .return_once(|_| Err(StorageError::connection("down")));

        let aggregator = HistoryAggregator::new(Arc::new(repo));
        let err = aggregator
            .history(day())
            .await
            .expect_err("storage failure surfaces");
        assert_eq!(err, StorageError::connection("down"));
    }

    #[rstest]
    #[tokio::test]
    async fn history_is_zeroed_for_days_without_unparks() {
        let mut repo = MockParkingHistoryRepository::new();
        repo.expect_find_by_day()
            .with(eq(day()))
            .return_once(|_| Ok(None));

        let aggregator = HistoryAggregator::new(Arc::new(repo));
        let history = aggregator.history(day()).await.expect("lookup succeeds");
        assert_eq!(history, DailyHistory::empty(day()));
    }

    #[rstest]
    fn plus_adds_every_counter() {
        let totals = DailyHistory::new(day(), 2, 5, 50).plus(UsageIncrement {
            cars: 1,
            hours: 3,
            revenue: 30,
        });
        assert_eq!(totals, DailyHistory::new(day(), 3, 8, 80));
    }
}
