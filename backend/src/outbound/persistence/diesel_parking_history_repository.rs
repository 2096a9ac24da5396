//! PostgreSQL-backed `ParkingHistoryRepository` implementation.
//!
//! Increments are applied with a single `INSERT .. ON CONFLICT DO UPDATE`
//! that adds to the stored totals, so concurrent unparks on the same day
//! never lose an update. The upsert runs inside the unpark commit
//! transaction; this repository only reads.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ParkingHistoryRepository, StorageError};
use crate::domain::{DailyHistory, DayUsage};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{HistoryRow, to_db_int};
use super::pool::DbPool;
use super::schema::parking_history;

/// Diesel-backed implementation of the `ParkingHistoryRepository` port.
#[derive(Clone)]
pub struct DieselParkingHistoryRepository {
    pool: DbPool,
}

impl DieselParkingHistoryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Row holding `usage` as a delta, ready for [`increment_day`].
pub(super) fn usage_row(usage: DayUsage) -> Result<HistoryRow, StorageError> {
    let increment = usage.increment;
    Ok(HistoryRow {
        day: usage.day,
        cars_parked: to_db_int(increment.cars, "cars_parked")?,
        total_parking_time: to_db_int(increment.hours, "total_parking_time")?,
        total_revenue_earned: to_db_int(increment.revenue, "total_revenue_earned")?,
    })
}

/// Add `delta` to its day's totals, creating the row on first use.
pub(super) async fn increment_day(
    conn: &mut AsyncPgConnection,
    delta: &HistoryRow,
) -> Result<(), diesel::result::Error> {
    diesel::insert_into(parking_history::table)
        .values(delta)
        .on_conflict(parking_history::day)
        .do_update()
        .set((
            parking_history::cars_parked
                .eq(parking_history::cars_parked + excluded(parking_history::cars_parked)),
            parking_history::total_parking_time.eq(parking_history::total_parking_time
                + excluded(parking_history::total_parking_time)),
            parking_history::total_revenue_earned.eq(parking_history::total_revenue_earned
                + excluded(parking_history::total_revenue_earned)),
        ))
        .execute(conn)
        .await
        .map(|_| ())
}

#[async_trait]
impl ParkingHistoryRepository for DieselParkingHistoryRepository {
    async fn find_by_day(&self, day: NaiveDate) -> Result<Option<DailyHistory>, StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<HistoryRow> = parking_history::table
            .filter(parking_history::day.eq(day))
            .select(HistoryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(DailyHistory::try_from).transpose()
    }
}
