//! Internal Diesel row structs and their conversions to domain types.
//!
//! Rows never leave the persistence layer. Integer columns are signed in
//! PostgreSQL, so conversions check ranges on the way in and report
//! out-of-range stored values as corrupt data.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::StorageError;
use crate::domain::{
    Car, CarId, DailyHistory, Lot, LotId, Slot, SlotId, SlotRecord, User, UserId,
};

use super::schema::{cars, parking_history, parking_lots, parking_slots, users};

// ---------------------------------------------------------------------------
// Lots and slots
// ---------------------------------------------------------------------------

/// Row struct for reading from the parking_lots table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = parking_lots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LotRow {
    pub id: Uuid,
    pub location: String,
    pub slot_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating lot records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = parking_lots)]
pub(crate) struct NewLotRow<'a> {
    pub id: Uuid,
    pub location: &'a str,
    pub slot_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the parking_slots table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = parking_slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SlotRow {
    pub id: Uuid,
    pub parking_lot_id: Uuid,
    pub relative_id: i32,
    pub is_booked: bool,
    pub is_in_maintenance: bool,
    pub car_id: Option<Uuid>,
    pub parked_at: Option<DateTime<Utc>>,
    pub unparked_at: Option<DateTime<Utc>>,
    pub revision: i32,
}

/// Insertable struct for slot records; also the full-row changeset used by
/// guarded transitions.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = parking_slots)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct SlotWrite {
    pub id: Uuid,
    pub parking_lot_id: Uuid,
    pub relative_id: i32,
    pub is_booked: bool,
    pub is_in_maintenance: bool,
    pub car_id: Option<Uuid>,
    pub parked_at: Option<DateTime<Utc>>,
    pub unparked_at: Option<DateTime<Utc>>,
    pub revision: i32,
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

/// Row struct for reading and inserting cars.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = cars)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CarRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub parking_slot_id: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Row struct for reading and upserting daily totals.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = parking_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HistoryRow {
    pub day: NaiveDate,
    pub cars_parked: i64,
    pub total_parking_time: i64,
    pub total_revenue_earned: i64,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Narrow a domain count for a signed column.
pub(crate) fn to_db_int<T, U>(value: T, column: &'static str) -> Result<U, StorageError>
where
    U: TryFrom<T>,
    T: Copy + std::fmt::Display,
{
    U::try_from(value)
        .map_err(|_| StorageError::query(format!("{column} value {value} is out of range")))
}

fn from_db_int<T, U>(value: T, column: &'static str) -> Result<U, StorageError>
where
    U: TryFrom<T>,
    T: Copy + std::fmt::Display,
{
    U::try_from(value)
        .map_err(|_| StorageError::corrupt(format!("stored {column} value {value} is negative")))
}

/// Reinterpret a wrapping revision counter as the signed column value.
#[expect(
    clippy::cast_possible_wrap,
    reason = "revisions wrap; the bit pattern round-trips through the column"
)]
pub(crate) const fn revision_to_db(revision: u32) -> i32 {
    revision as i32
}

#[expect(
    clippy::cast_sign_loss,
    reason = "inverse of revision_to_db"
)]
const fn revision_from_db(revision: i32) -> u32 {
    revision as u32
}

impl TryFrom<LotRow> for Lot {
    type Error = StorageError;

    fn try_from(row: LotRow) -> Result<Self, Self::Error> {
        Ok(Self::from_parts(
            LotId::from_uuid(row.id),
            row.location,
            from_db_int(row.slot_count, "slot_count")?,
            row.created_at,
        ))
    }
}

impl TryFrom<SlotRow> for Slot {
    type Error = StorageError;

    fn try_from(row: SlotRow) -> Result<Self, Self::Error> {
        let record = SlotRecord {
            id: SlotId::from_uuid(row.id),
            lot_id: LotId::from_uuid(row.parking_lot_id),
            relative_id: from_db_int(row.relative_id, "relative_id")?,
            is_booked: row.is_booked,
            is_in_maintenance: row.is_in_maintenance,
            car_id: row.car_id.map(CarId::from_uuid),
            parked_at: row.parked_at,
            unparked_at: row.unparked_at,
            revision: revision_from_db(row.revision),
        };
        Self::from_record(record).map_err(|err| StorageError::corrupt(err.to_string()))
    }
}

impl SlotWrite {
    /// Flatten a domain slot into column values.
    pub(crate) fn from_slot(slot: &Slot) -> Result<Self, StorageError> {
        let record = slot.to_record();
        Ok(Self {
            id: *record.id.as_uuid(),
            parking_lot_id: *record.lot_id.as_uuid(),
            relative_id: to_db_int(record.relative_id, "relative_id")?,
            is_booked: record.is_booked,
            is_in_maintenance: record.is_in_maintenance,
            car_id: record.car_id.map(|id| *id.as_uuid()),
            parked_at: record.parked_at,
            unparked_at: record.unparked_at,
            revision: revision_to_db(record.revision),
        })
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self::from_parts(UserId::from_uuid(row.id), row.name)
    }
}

impl From<CarRow> for Car {
    fn from(row: CarRow) -> Self {
        Self::from_parts(
            CarId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            row.parking_slot_id.map(SlotId::from_uuid),
        )
    }
}

impl From<&Car> for CarRow {
    fn from(car: &Car) -> Self {
        Self {
            id: *car.id().as_uuid(),
            user_id: *car.user_id().as_uuid(),
            parking_slot_id: car.slot_id().map(|id| *id.as_uuid()),
        }
    }
}

impl TryFrom<HistoryRow> for DailyHistory {
    type Error = StorageError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        Ok(Self::new(
            row.day,
            from_db_int(row.cars_parked, "cars_parked")?,
            from_db_int(row.total_parking_time, "total_parking_time")?,
            from_db_int(row.total_revenue_earned, "total_revenue_earned")?,
        ))
    }
}
