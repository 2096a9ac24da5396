//! Account service implementing the registration driving port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::account::{Car, User};
use super::ids::{CarId, UserId};
use super::parking_error::{Entity, ParkingError};
use super::ports::{AccountCommand, AccountRepository};

/// Registers users and their cars.
#[derive(Clone)]
pub struct AccountService<A> {
    accounts: Arc<A>,
}

impl<A> AccountService<A> {
    /// Create the service over an account repository.
    pub const fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl<A> AccountCommand for AccountService<A>
where
    A: AccountRepository,
{
    async fn create_user(&self, name: String) -> Result<User, ParkingError> {
        let user = User::new(UserId::random(), name)?;
        self.accounts.create_user(&user).await?;
        info!(user_id = %user.id(), "user created");
        Ok(user)
    }

    async fn create_car(&self, user_id: UserId) -> Result<Car, ParkingError> {
        if self.accounts.find_user(&user_id).await?.is_none() {
            return Err(ParkingError::not_found(Entity::User, user_id));
        }
        let car = Car::new(CarId::random(), user_id);
        self.accounts.create_car(&car).await?;
        info!(%user_id, car_id = %car.id(), "car created");
        Ok(car)
    }
}
