//! Port for daily usage history.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::DailyHistory;

use super::StorageError;

/// Read port for the per-day usage counters.
///
/// Increments are not written through this port: they travel on the unpark
/// [`SlotCommit`](super::SlotCommit) and are applied by the slot transition
/// store in the same unit as the slot and car writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParkingHistoryRepository: Send + Sync {
    /// Read the record for `day`.
    async fn find_by_day(&self, day: NaiveDate) -> Result<Option<DailyHistory>, StorageError>;
}
