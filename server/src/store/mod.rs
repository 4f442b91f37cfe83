//! # Document store
//!
//! Persistence is modelled as a partitioned document database: every
//! document lives in a container, inside a partition, under an id, as a
//! JSON body. A missing document is a normal `None`/`false` result; any
//! other storage failure is fatal for the request that hit it.
//!
//! Two backends implement the same contract:
//! - [`redis::RedisStore`] — the managed deployment backend
//! - [`memory::MemoryStore`] — lock-protected maps for tests and for
//!   running without external services

pub mod memory;
pub mod redis;

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("document already exists: {0}")]
    Conflict(String),

    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("redis: {0}")]
    Redis(#[from] ::redis::RedisError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Liveness probe for the health endpoint.
    async fn ping(&self) -> StoreResult<()>;

    /// Point read inside a known partition.
    async fn read(&self, container: &str, partition: &str, id: &str) -> StoreResult<Option<String>>;

    /// Point read without a partition key (cross-partition lookup).
    async fn find(&self, container: &str, id: &str) -> StoreResult<Option<String>>;

    /// Inserts a new document; `Conflict` if the id is already taken.
    async fn create(&self, container: &str, partition: &str, id: &str, body: String) -> StoreResult<()>;

    /// Insert-or-replace. Last write wins; there is no concurrency check.
    async fn upsert(&self, container: &str, partition: &str, id: &str, body: String) -> StoreResult<()>;

    /// Physical removal. Returns false when the document was absent.
    async fn delete(&self, container: &str, partition: &str, id: &str) -> StoreResult<bool>;

    /// Every document in one partition.
    async fn list_partition(&self, container: &str, partition: &str) -> StoreResult<Vec<String>>;

    /// Every document in the container, across all partitions.
    async fn scan(&self, container: &str) -> StoreResult<Vec<String>>;
}

/// A persisted entity: which container it lives in and how it is keyed.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const CONTAINER: &'static str;

    fn id(&self) -> &str;
    fn partition_key(&self) -> &str;
}

impl Document for pantry::user::User {
    const CONTAINER: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }

    fn partition_key(&self) -> &str {
        &self.id
    }
}

impl Document for pantry::restaurant::Restaurant {
    const CONTAINER: &'static str = "restaurants";

    fn id(&self) -> &str {
        &self.id
    }

    fn partition_key(&self) -> &str {
        &self.city
    }
}

impl Document for pantry::menu::MenuItem {
    const CONTAINER: &'static str = "menu-items";

    fn id(&self) -> &str {
        &self.id
    }

    fn partition_key(&self) -> &str {
        &self.restaurant_id
    }
}

impl Document for pantry::order::Order {
    const CONTAINER: &'static str = "orders";

    fn id(&self) -> &str {
        &self.id
    }

    fn partition_key(&self) -> &str {
        &self.user_id
    }
}

/// Typed view over one container: serde round-tripping on top of the raw
/// [`DocumentStore`] calls.
pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub async fn get(&self, id: &str) -> StoreResult<Option<T>> {
        match self.store.find(T::CONTAINER, id).await? {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    pub async fn get_in_partition(&self, partition: &str, id: &str) -> StoreResult<Option<T>> {
        match self.store.read(T::CONTAINER, partition, id).await? {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    pub async fn create(&self, doc: &T) -> StoreResult<()> {
        let body = serde_json::to_string(doc)?;
        self.store
            .create(T::CONTAINER, doc.partition_key(), doc.id(), body)
            .await
    }

    pub async fn upsert(&self, doc: &T) -> StoreResult<()> {
        let body = serde_json::to_string(doc)?;
        self.store
            .upsert(T::CONTAINER, doc.partition_key(), doc.id(), body)
            .await
    }

    pub async fn delete(&self, partition: &str, id: &str) -> StoreResult<bool> {
        self.store.delete(T::CONTAINER, partition, id).await
    }

    pub async fn list_partition(&self, partition: &str) -> StoreResult<Vec<T>> {
        let bodies = self.store.list_partition(T::CONTAINER, partition).await?;
        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(StoreError::from))
            .collect()
    }

    pub async fn scan(&self) -> StoreResult<Vec<T>> {
        let bodies = self.store.scan(T::CONTAINER).await?;
        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(StoreError::from))
            .collect()
    }
}
