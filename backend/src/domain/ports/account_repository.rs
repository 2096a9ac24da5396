//! Port for user and car persistence.

use async_trait::async_trait;

use crate::domain::{Car, CarId, User, UserId};

use super::StorageError;

/// Port for registering users and their cars.
///
/// Car parking state is never written through this port; it changes only
/// through [`super::SlotTransitionRepository`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persist a new user.
    async fn create_user(&self, user: &User) -> Result<(), StorageError>;

    /// Find a user by id.
    async fn find_user(&self, user_id: &UserId) -> Result<Option<User>, StorageError>;

    /// Persist a new, unparked car.
    async fn create_car(&self, car: &Car) -> Result<(), StorageError>;

    /// Find a car by id.
    async fn find_car(&self, car_id: &CarId) -> Result<Option<Car>, StorageError>;
}
