//! Shared helper utilities for backend integration tests.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeDelta, Utc};

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{provision_template_database, shared_cluster};

static NEXT_DAY: AtomicI64 = AtomicI64::new(0);

/// Midday on a calendar day no other test in this process uses.
pub fn unique_midday() -> DateTime<Utc> {
    let offset = NEXT_DAY.fetch_add(1, Ordering::Relaxed);
    let base = DateTime::from_timestamp(1_893_499_200, 0).unwrap_or_default();
    base + TimeDelta::days(offset)
}
