use std::sync::Arc;

use tracing::info;

use crate::config::{Config, StoreBackend};
use crate::database::init_redis;
use crate::payments::PaymentFactory;
use crate::repository::{
    MenuItemRepository, OrderRepository, RestaurantRepository, UserRepository,
};
use crate::services::{AuthService, OrderService, RestaurantService, UserService};
use crate::store::memory::MemoryStore;
use crate::store::redis::RedisStore;
use crate::store::DocumentStore;

/// Everything a request handler needs, built once at startup and shared
/// behind an `Arc`. The storage handle lives here and is passed in — no
/// ambient globals.
pub struct State {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub auth: AuthService,
    pub users: UserService,
    pub restaurants: RestaurantService,
    pub orders: OrderService,
    pub payments: PaymentFactory,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::Redis => {
                info!("Connecting to redis at {}", config.redis_url);
                Arc::new(RedisStore::new(init_redis(&config.redis_url).await))
            }
            StoreBackend::Memory => {
                info!("Using in-memory store");
                Arc::new(MemoryStore::new())
            }
        };

        Self::with_store(config, store)
    }

    /// Wires repositories and services over an already-built store.
    /// Integration tests use this with a [`MemoryStore`].
    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> Arc<Self> {
        let users = UserRepository::new(store.clone());
        let orders = OrderRepository::new(store.clone());
        let restaurants = RestaurantRepository::new(store.clone());
        let menu = MenuItemRepository::new(store.clone());

        Arc::new(Self {
            auth: AuthService::new(users.clone(), config.jwt.clone()),
            users: UserService::new(users, orders.clone()),
            restaurants: RestaurantService::new(restaurants, menu.clone()),
            orders: OrderService::new(orders, menu),
            payments: PaymentFactory::new(&config.payments, reqwest::Client::new()),
            store,
            config,
        })
    }
}
