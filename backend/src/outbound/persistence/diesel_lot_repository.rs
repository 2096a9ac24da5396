//! PostgreSQL-backed `LotRepository` implementation using Diesel ORM.
//!
//! A lot and all of its slots are inserted in one transaction. The free-slot
//! scan is served by the `(parking_lot_id, is_booked, relative_id)` index.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{LotRepository, StorageError};
use crate::domain::{Lot, LotId, Slot, SlotId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{LotRow, NewLotRow, SlotRow, SlotWrite, to_db_int};
use super::pool::DbPool;
use super::schema::{parking_lots, parking_slots};

/// Rows per slot insert statement; keeps bind parameters under PostgreSQL's
/// 65535 limit.
const SLOT_INSERT_CHUNK: usize = 1_000;

/// Diesel-backed implementation of the `LotRepository` port.
#[derive(Clone)]
pub struct DieselLotRepository {
    pool: DbPool,
}

impl DieselLotRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LotRepository for DieselLotRepository {
    async fn create_lot(&self, lot: &Lot, slots: &[Slot]) -> Result<(), StorageError> {
        let lot_row = NewLotRow {
            id: *lot.id().as_uuid(),
            location: lot.location(),
            slot_count: to_db_int(lot.slot_count(), "slot_count")?,
            created_at: lot.created_at(),
        };
        let slot_rows = slots
            .iter()
            .map(SlotWrite::from_slot)
            .collect::<Result<Vec<_>, _>>()?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(parking_lots::table)
                    .values(&lot_row)
                    .execute(conn)
                    .await?;
                for chunk in slot_rows.chunks(SLOT_INSERT_CHUNK) {
                    diesel::insert_into(parking_slots::table)
                        .values(chunk)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn find_lot(&self, lot_id: &LotId) -> Result<Option<Lot>, StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<LotRow> = parking_lots::table
            .filter(parking_lots::id.eq(lot_id.as_uuid()))
            .select(LotRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Lot::try_from).transpose()
    }

    async fn list_slots(&self, lot_id: &LotId) -> Result<Vec<Slot>, StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SlotRow> = parking_slots::table
            .filter(parking_slots::parking_lot_id.eq(lot_id.as_uuid()))
            .order(parking_slots::relative_id.asc())
            .select(SlotRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(Slot::try_from).collect()
    }

    async fn find_slot(&self, slot_id: &SlotId) -> Result<Option<Slot>, StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SlotRow> = parking_slots::table
            .filter(parking_slots::id.eq(slot_id.as_uuid()))
            .select(SlotRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Slot::try_from).transpose()
    }

    async fn find_first_free_slot(&self, lot_id: &LotId) -> Result<Option<Slot>, StorageError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<SlotRow> = parking_slots::table
            .filter(parking_slots::parking_lot_id.eq(lot_id.as_uuid()))
            .filter(parking_slots::is_booked.eq(false))
            .order(parking_slots::relative_id.asc())
            .select(SlotRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(Slot::try_from).transpose()
    }
}
