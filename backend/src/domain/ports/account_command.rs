//! Driving port for user and car registration.

use async_trait::async_trait;

use crate::domain::{Car, ParkingError, User, UserId};

/// Registration use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a user under `name`.
    async fn create_user(&self, name: String) -> Result<User, ParkingError>;

    /// Register a new car for an existing user.
    async fn create_car(&self, user_id: UserId) -> Result<Car, ParkingError>;
}
