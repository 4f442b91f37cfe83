use pantry::now;
use pantry::order::Order;
use pantry::user::{Address, UpdateProfileRequest, UserProfile};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::repository::{OrderRepository, UserRepository};

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    orders: OrderRepository,
}

impl UserService {
    pub fn new(users: UserRepository, orders: OrderRepository) -> Self {
        Self { users, orders }
    }

    pub async fn profile(&self, id: &str) -> AppResult<UserProfile> {
        self.users
            .get(id)
            .await?
            .filter(|user| !user.is_deleted)
            .map(|user| user.profile())
            .ok_or(AppError::NotFound)
    }

    /// Only name, phone and address are caller-editable; email, role and
    /// credentials have their own flows.
    pub async fn update_profile(
        &self,
        id: &str,
        request: UpdateProfileRequest,
    ) -> AppResult<UserProfile> {
        info!("Updating profile for user {id}");

        let mut user = self
            .users
            .get(id)
            .await?
            .filter(|user| !user.is_deleted)
            .ok_or(AppError::NotFound)?;

        user.first_name = request.first_name;
        user.last_name = request.last_name;
        user.phone_number = request.phone_number;
        if let Some(address) = request.address {
            user.address = Some(address);
        }
        user.updated_at = now();

        self.users.update(&user).await?;
        Ok(user.profile())
    }

    pub async fn update_address(&self, id: &str, address: Address) -> AppResult<bool> {
        let Some(mut user) = self.users.get(id).await? else {
            return Ok(false);
        };

        user.address = Some(address);
        user.updated_at = now();
        self.users.update(&user).await?;
        Ok(true)
    }

    pub async fn order_history(&self, user_id: &str) -> AppResult<Vec<Order>> {
        Ok(self.orders.by_user(user_id).await?)
    }
}
