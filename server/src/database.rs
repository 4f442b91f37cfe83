//! Redis connection bootstrap. The connection manager reconnects on its
//! own; a short connect timeout keeps startup failures loud and early.

use std::time::Duration;

use redis::{
    aio::{ConnectionManager, ConnectionManagerConfig},
    Client,
};

pub async fn init_redis(redis_url: &str) -> ConnectionManager {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(500));

    let client = Client::open(redis_url).expect("Invalid REDIS_URL");

    client
        .get_connection_manager_with_config(config)
        .await
        .expect("Failed to connect to redis")
}
