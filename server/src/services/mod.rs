//! Business logic. Services own validation and the order state machine;
//! repositories own persistence; routes own transport and policy checks.

pub mod auth;
pub mod orders;
pub mod restaurants;
pub mod users;

pub use auth::AuthService;
pub use orders::OrderService;
pub use restaurants::RestaurantService;
pub use users::UserService;
