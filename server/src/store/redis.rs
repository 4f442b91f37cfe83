//! # Redis document store
//!
//! Layout, per container:
//! - `pantry:{container}:{partition}` — hash of document id to JSON body
//! - `pantry:{container}:partitions` — set of known partition keys,
//!   driving cross-partition scans
//! - `pantry:{container}:index` — hash of document id to partition key,
//!   driving cross-partition point reads
//!
//! Hash fields keep single-partition listings to one round trip, and the
//! partition set bounds a scan to the partitions that actually exist.
//! Upserts are plain `HSET`: last write wins, no concurrency check.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{DocumentStore, StoreError, StoreResult};

const KEY_PREFIX: &str = "pantry";

pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    pub fn new(connection: ConnectionManager) -> Self {
        Self { connection }
    }

    fn partition_key(container: &str, partition: &str) -> String {
        format!("{KEY_PREFIX}:{container}:{partition}")
    }

    fn partitions_key(container: &str) -> String {
        format!("{KEY_PREFIX}:{container}:partitions")
    }

    fn index_key(container: &str) -> String {
        format!("{KEY_PREFIX}:{container}:index")
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn read(&self, container: &str, partition: &str, id: &str) -> StoreResult<Option<String>> {
        let mut conn = self.connection.clone();
        let body: Option<String> = conn.hget(Self::partition_key(container, partition), id).await?;
        Ok(body)
    }

    async fn find(&self, container: &str, id: &str) -> StoreResult<Option<String>> {
        let mut conn = self.connection.clone();
        let partition: Option<String> = conn.hget(Self::index_key(container), id).await?;
        match partition {
            Some(partition) => self.read(container, &partition, id).await,
            None => Ok(None),
        }
    }

    async fn create(&self, container: &str, partition: &str, id: &str, body: String) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        let indexed: bool = conn.hset_nx(Self::index_key(container), id, partition).await?;
        if !indexed {
            return Err(StoreError::Conflict(id.to_string()));
        }
        let _: () = conn
            .hset(Self::partition_key(container, partition), id, body)
            .await?;
        let _: () = conn.sadd(Self::partitions_key(container), partition).await?;
        Ok(())
    }

    async fn upsert(&self, container: &str, partition: &str, id: &str, body: String) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn
            .hset(Self::partition_key(container, partition), id, body)
            .await?;
        let _: () = conn.hset(Self::index_key(container), id, partition).await?;
        let _: () = conn.sadd(Self::partitions_key(container), partition).await?;
        Ok(())
    }

    async fn delete(&self, container: &str, partition: &str, id: &str) -> StoreResult<bool> {
        let mut conn = self.connection.clone();
        let removed: i64 = conn.hdel(Self::partition_key(container, partition), id).await?;
        if removed == 0 {
            return Ok(false);
        }
        let _: () = conn.hdel(Self::index_key(container), id).await?;
        Ok(true)
    }

    async fn list_partition(&self, container: &str, partition: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.connection.clone();
        let bodies: Vec<String> = conn.hvals(Self::partition_key(container, partition)).await?;
        Ok(bodies)
    }

    async fn scan(&self, container: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.connection.clone();
        let partitions: Vec<String> = conn.smembers(Self::partitions_key(container)).await?;

        let mut bodies = Vec::new();
        for partition in partitions {
            let mut chunk: Vec<String> =
                conn.hvals(Self::partition_key(container, &partition)).await?;
            bodies.append(&mut chunk);
        }
        Ok(bodies)
    }
}
