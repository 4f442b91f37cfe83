//! Typed repositories over the document store: one per container, carrying
//! the entity-specific queries. "Not found" is a normal `None`; soft-deleted
//! documents are filtered by the listing queries here, while point reads
//! return the raw record and leave the deleted check to the service layer.

pub mod menu;
pub mod orders;
pub mod restaurants;
pub mod users;

pub use menu::MenuItemRepository;
pub use orders::OrderRepository;
pub use restaurants::RestaurantRepository;
pub use users::UserRepository;
