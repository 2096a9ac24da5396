//! PostgreSQL-backed `SlotTransitionRepository` implementation.
//!
//! A commit is one transaction holding two conditional updates. The slot
//! update is guarded by `revision`; the car update is guarded by the car's
//! current slot reference. When the slot guard fails nothing has been
//! written. When the car guard fails the transaction is rolled back so the
//! slot write disappears with it. An unpark commit also adds its usage to
//! the day's history row in the same transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    CarLink, CommitOutcome, SlotCommit, SlotTransitionRepository, StorageError,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::diesel_parking_history_repository::{increment_day, usage_row};
use super::models::{SlotWrite, revision_to_db};
use super::pool::DbPool;
use super::schema::{cars, parking_slots};

/// Reasons a commit transaction is rolled back.
#[derive(Debug)]
enum CommitAbort {
    StaleCar,
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for CommitAbort {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

/// Diesel-backed implementation of the `SlotTransitionRepository` port.
#[derive(Clone)]
pub struct DieselSlotTransitionRepository {
    pool: DbPool,
}

impl DieselSlotTransitionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn move_car(conn: &mut AsyncPgConnection, link: CarLink) -> Result<usize, CommitAbort> {
    let car_id: Uuid = *link.car_id.as_uuid();
    let next_slot = link.next_slot.map(|id| *id.as_uuid());
    let updated = match link.expected_slot {
        Some(expected) => {
            diesel::update(
                cars::table
                    .filter(cars::id.eq(car_id))
                    .filter(cars::parking_slot_id.eq(*expected.as_uuid())),
            )
            .set(cars::parking_slot_id.eq(next_slot))
            .execute(conn)
            .await?
        }
        None => {
            diesel::update(
                cars::table
                    .filter(cars::id.eq(car_id))
                    .filter(cars::parking_slot_id.is_null()),
            )
            .set(cars::parking_slot_id.eq(next_slot))
            .execute(conn)
            .await?
        }
    };
    Ok(updated)
}

#[async_trait]
impl SlotTransitionRepository for DieselSlotTransitionRepository {
    async fn apply(&self, commit: &SlotCommit) -> Result<CommitOutcome, StorageError> {
        let write = SlotWrite::from_slot(&commit.slot)?;
        let slot_id = write.id;
        let expected_revision = revision_to_db(commit.expected_revision);
        let car = commit.car;
        let usage = commit.usage.map(usage_row).transpose()?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let result = conn
            .transaction(|conn| {
                async move {
                    let updated = diesel::update(
                        parking_slots::table
                            .filter(parking_slots::id.eq(slot_id))
                            .filter(parking_slots::revision.eq(expected_revision)),
                    )
                    .set(&write)
                    .execute(conn)
                    .await?;
                    if updated == 0 {
                        return Ok(CommitOutcome::StaleSlot);
                    }

                    if let Some(link) = car {
                        if move_car(conn, link).await? == 0 {
                            return Err(CommitAbort::StaleCar);
                        }
                    }
                    if let Some(delta) = &usage {
                        increment_day(conn, delta).await?;
                    }
                    Ok(CommitOutcome::Applied)
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(outcome) => {
                if outcome == CommitOutcome::StaleSlot {
                    debug!(%slot_id, "slot revision moved on before commit");
                }
                Ok(outcome)
            }
            Err(CommitAbort::StaleCar) => {
                debug!(%slot_id, "car reference moved on; slot write rolled back");
                Ok(CommitOutcome::StaleCar)
            }
            Err(CommitAbort::Diesel(error)) => Err(map_diesel_error(error)),
        }
    }
}
