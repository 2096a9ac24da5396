//! Parking fee computation.

use chrono::{DateTime, Utc};

/// Hourly rate applied when none is configured.
pub const DEFAULT_HOURLY_RATE: u64 = 10;

const SECONDS_PER_HOUR: u64 = 3_600;

/// Fee charged for one completed stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Billing {
    duration_hours: u64,
    amount: u64,
}

impl Billing {
    /// Build a billing outcome from its parts.
    pub const fn new(duration_hours: u64, amount: u64) -> Self {
        Self {
            duration_hours,
            amount,
        }
    }

    /// Billed hours, partial hours rounded up.
    pub const fn duration_hours(&self) -> u64 {
        self.duration_hours
    }

    /// Amount owed in currency units.
    pub const fn amount(&self) -> u64 {
        self.amount
    }
}

/// Pricing policy applied on unpark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPolicy {
    hourly_rate: u64,
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_HOURLY_RATE)
    }
}

impl BillingPolicy {
    /// Charge `hourly_rate` per started hour.
    pub const fn new(hourly_rate: u64) -> Self {
        Self { hourly_rate }
    }

    /// Configured hourly rate.
    pub const fn hourly_rate(&self) -> u64 {
        self.hourly_rate
    }

    /// Bill the stay between `parked_at` and `unparked_at`.
    ///
    /// Every started hour is charged in full. A departure recorded before the
    /// arrival (clock skew between instances) bills nothing.
    ///
    /// # Examples
    /// ```
    /// use chrono::{DateTime, TimeDelta};
    /// use parking_backend::domain::BillingPolicy;
    ///
    /// let parked = DateTime::from_timestamp(0, 0).unwrap();
    /// let bill = BillingPolicy::default().bill(parked, parked + TimeDelta::minutes(61));
    /// assert_eq!(bill.duration_hours(), 2);
    /// assert_eq!(bill.amount(), 20);
    /// ```
    pub fn bill(&self, parked_at: DateTime<Utc>, unparked_at: DateTime<Utc>) -> Billing {
        let stay = unparked_at.signed_duration_since(parked_at);
        let whole_seconds = u64::try_from(stay.num_seconds()).unwrap_or(0);
        let has_fraction = stay.subsec_nanos() > 0;
        let seconds = whole_seconds.saturating_add(u64::from(has_fraction));
        let duration_hours = seconds.div_ceil(SECONDS_PER_HOUR);
        Billing::new(duration_hours, duration_hours.saturating_mul(self.hourly_rate))
    }
}
