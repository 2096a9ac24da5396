//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Parking lots. Slot rows are created with the lot and never added later.
    parking_lots (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Human-readable address or name.
        location -> Varchar,
        /// Number of slots created with the lot.
        slot_count -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Parking slots with their lifecycle flags and optimistic revision.
    parking_slots (id) {
        id -> Uuid,
        parking_lot_id -> Uuid,
        /// 1-based position within the lot, unique per lot.
        relative_id -> Int4,
        is_booked -> Bool,
        is_in_maintenance -> Bool,
        /// Occupying car while the slot is booked for parking.
        car_id -> Nullable<Uuid>,
        parked_at -> Nullable<Timestamptz>,
        unparked_at -> Nullable<Timestamptz>,
        /// Incremented on every committed transition.
        revision -> Int4,
    }
}

diesel::table! {
    /// Registered car owners.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Cars and the slot each currently occupies.
    cars (id) {
        id -> Uuid,
        user_id -> Uuid,
        parking_slot_id -> Nullable<Uuid>,
    }
}

diesel::table! {
    /// Per-day usage totals, keyed by UTC calendar day.
    parking_history (day) {
        day -> Date,
        cars_parked -> Int8,
        total_parking_time -> Int8,
        total_revenue_earned -> Int8,
    }
}

diesel::joinable!(parking_slots -> parking_lots (parking_lot_id));
diesel::joinable!(cars -> users (user_id));
diesel::joinable!(cars -> parking_slots (parking_slot_id));

diesel::allow_tables_to_appear_in_same_query!(
    parking_lots,
    parking_slots,
    users,
    cars,
    parking_history,
);
