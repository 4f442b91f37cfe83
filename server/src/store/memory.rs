//! In-memory [`DocumentStore`] with the same semantics as the redis
//! backend. Tests run against this; it also lets the server come up with
//! no external services when configured with `STORE_BACKEND=memory`.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{DocumentStore, StoreError, StoreResult};

#[derive(Default)]
struct Container {
    /// partition key -> (document id -> JSON body)
    partitions: HashMap<String, BTreeMap<String, String>>,
    /// document id -> partition key, for cross-partition point reads
    index: HashMap<String, String>,
}

#[derive(Default)]
pub struct MemoryStore {
    containers: RwLock<HashMap<String, Container>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn read(&self, container: &str, partition: &str, id: &str) -> StoreResult<Option<String>> {
        let containers = self.containers.read().unwrap();
        Ok(containers
            .get(container)
            .and_then(|c| c.partitions.get(partition))
            .and_then(|p| p.get(id))
            .cloned())
    }

    async fn find(&self, container: &str, id: &str) -> StoreResult<Option<String>> {
        let containers = self.containers.read().unwrap();
        let Some(c) = containers.get(container) else {
            return Ok(None);
        };
        let Some(partition) = c.index.get(id) else {
            return Ok(None);
        };
        Ok(c.partitions.get(partition).and_then(|p| p.get(id)).cloned())
    }

    async fn create(&self, container: &str, partition: &str, id: &str, body: String) -> StoreResult<()> {
        let mut containers = self.containers.write().unwrap();
        let c = containers.entry(container.to_string()).or_default();
        if c.index.contains_key(id) {
            return Err(StoreError::Conflict(id.to_string()));
        }
        c.partitions
            .entry(partition.to_string())
            .or_default()
            .insert(id.to_string(), body);
        c.index.insert(id.to_string(), partition.to_string());
        Ok(())
    }

    async fn upsert(&self, container: &str, partition: &str, id: &str, body: String) -> StoreResult<()> {
        let mut containers = self.containers.write().unwrap();
        let c = containers.entry(container.to_string()).or_default();
        // A document never migrates partitions; the partition key fields
        // (user id, restaurant id, city) are fixed at creation.
        c.partitions
            .entry(partition.to_string())
            .or_default()
            .insert(id.to_string(), body);
        c.index.insert(id.to_string(), partition.to_string());
        Ok(())
    }

    async fn delete(&self, container: &str, partition: &str, id: &str) -> StoreResult<bool> {
        let mut containers = self.containers.write().unwrap();
        let Some(c) = containers.get_mut(container) else {
            return Ok(false);
        };
        let removed = c
            .partitions
            .get_mut(partition)
            .map(|p| p.remove(id).is_some())
            .unwrap_or(false);
        if removed {
            c.index.remove(id);
        }
        Ok(removed)
    }

    async fn list_partition(&self, container: &str, partition: &str) -> StoreResult<Vec<String>> {
        let containers = self.containers.read().unwrap();
        Ok(containers
            .get(container)
            .and_then(|c| c.partitions.get(partition))
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn scan(&self, container: &str) -> StoreResult<Vec<String>> {
        let containers = self.containers.read().unwrap();
        Ok(containers
            .get(container)
            .map(|c| {
                c.partitions
                    .values()
                    .flat_map(|p| p.values().cloned())
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_read_and_find() {
        let store = MemoryStore::new();
        store
            .create("orders", "user-1", "o1", "{\"n\":1}".into())
            .await
            .unwrap();

        assert_eq!(
            store.read("orders", "user-1", "o1").await.unwrap().as_deref(),
            Some("{\"n\":1}")
        );
        assert_eq!(
            store.find("orders", "o1").await.unwrap().as_deref(),
            Some("{\"n\":1}")
        );
        assert!(store.read("orders", "user-2", "o1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_ids() {
        let store = MemoryStore::new();
        store.create("orders", "u", "o1", "{}".into()).await.unwrap();
        let err = store.create("orders", "u", "o1", "{}".into()).await;
        assert!(matches!(err, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn upsert_overwrites_and_scan_crosses_partitions() {
        let store = MemoryStore::new();
        store.upsert("orders", "u1", "o1", "a".into()).await.unwrap();
        store.upsert("orders", "u1", "o1", "b".into()).await.unwrap();
        store.upsert("orders", "u2", "o2", "c".into()).await.unwrap();

        let partition = store.list_partition("orders", "u1").await.unwrap();
        assert_eq!(partition, vec!["b".to_string()]);

        let mut all = store.scan("orders").await.unwrap();
        all.sort();
        assert_eq!(all, vec!["b".to_string(), "c".to_string()]);
    }

    #[tokio::test]
    async fn delete_reports_absence() {
        let store = MemoryStore::new();
        store.upsert("orders", "u", "o1", "{}".into()).await.unwrap();
        assert!(store.delete("orders", "u", "o1").await.unwrap());
        assert!(!store.delete("orders", "u", "o1").await.unwrap());
        assert!(store.find("orders", "o1").await.unwrap().is_none());
    }
}
