//! Slot allocation.
//!
//! The allocator picks the free slot with the lowest relative id and books it
//! through a guarded commit. Losing a race for that slot means another
//! request booked it, so the allocator reads the next lowest free slot and
//! tries again, up to [`AllocationPolicy::max_attempts`] times.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::ids::{CarId, LotId};
use super::lifecycle::{SlotTransition, TransitionConflict};
use super::parking_error::ParkingError;
use super::ports::{CommitOutcome, LotRepository, SlotCommit, SlotTransitionRepository};
use super::slot::Slot;

/// Attempts made when no policy is configured.
pub const DEFAULT_ALLOCATION_ATTEMPTS: u32 = 8;

/// Bounds on allocation retries.
///
/// A request only loses a round to a competing request that committed, so
/// `max_attempts` at least equal to the number of concurrent contenders
/// always succeeds while free slots remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationPolicy {
    max_attempts: u32,
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOCATION_ATTEMPTS)
    }
}

impl AllocationPolicy {
    /// Allow `max_attempts` commits; zero is raised to one.
    pub const fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
        }
    }

    /// Number of commits attempted before giving up.
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

/// Reserves the best available slot in a lot for a car.
pub struct SlotAllocator<L, T> {
    lots: Arc<L>,
    transitions: Arc<T>,
    policy: AllocationPolicy,
}

impl<L, T> SlotAllocator<L, T> {
    /// Create an allocator over the given repositories.
    pub const fn new(lots: Arc<L>, transitions: Arc<T>, policy: AllocationPolicy) -> Self {
        Self {
            lots,
            transitions,
            policy,
        }
    }
}

impl<L, T> SlotAllocator<L, T>
where
    L: LotRepository,
    T: SlotTransitionRepository,
{
    /// Book the lowest free slot in `lot_id` for `car_id`.
    ///
    /// # Errors
    /// - [`ParkingError::ResourceExhausted`] when no free slot remains or
    ///   every attempt lost its race.
    /// - [`TransitionConflict::AlreadyParked`] when the car was parked
    ///   elsewhere concurrently.
    /// - [`ParkingError::Storage`] when the store fails.
    pub async fn allocate(
        &self,
        lot_id: LotId,
        car_id: CarId,
        now: DateTime<Utc>,
    ) -> Result<Slot, ParkingError> {
        for attempt in 1..=self.policy.max_attempts() {
            let Some(candidate) = self.lots.find_first_free_slot(&lot_id).await? else {
                debug!(%lot_id, %car_id, attempt, "no free slot left");
                return Err(ParkingError::resource_exhausted(lot_id));
            };
            let next = candidate.apply(SlotTransition::Park { car_id, at: now })?;
            let commit = SlotCommit::park(&candidate, next.clone(), car_id);

            match self.transitions.apply(&commit).await? {
                CommitOutcome::Applied => return Ok(next),
                CommitOutcome::StaleCar => return Err(TransitionConflict::AlreadyParked.into()),
                CommitOutcome::StaleSlot => {
                    debug!(
                        %lot_id,
                        %car_id,
                        slot_id = %candidate.id(),
                        relative_id = %candidate.relative_id(),
                        attempt,
                        "lost race for slot; retrying"
                    );
                }
            }
        }

        warn!(
            %lot_id,
            %car_id,
            attempts = self.policy.max_attempts(),
            "allocation retries exhausted"
        );
        Err(ParkingError::resource_exhausted(lot_id))
    }
}
