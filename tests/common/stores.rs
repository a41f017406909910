//! Fault-injecting store wrappers

use async_trait::async_trait;
use grimoire::storage::{InMemoryStore, Query, Record, RecordStore, StoreError};
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};

/// Store that fails every progress-count update while letting all other
/// operations (including status transitions) through.
pub struct CountUpdateFailingStore {
    inner: InMemoryStore,
    injected: AtomicU32,
}

impl CountUpdateFailingStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            injected: AtomicU32::new(0),
        }
    }

    /// Number of failures injected so far
    pub fn injected(&self) -> u32 {
        self.injected.load(Ordering::SeqCst)
    }
}

impl Default for CountUpdateFailingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for CountUpdateFailingStore {
    async fn insert(&self, collection: &str, document: Value) -> Result<String, StoreError> {
        self.inner.insert(collection, document).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        if patch.get("successCount").is_some() {
            self.injected.fetch_add(1, Ordering::SeqCst);
            return Err(StoreError::Backend("injected write failure".to_string()));
        }
        self.inner.update(collection, id, patch).await
    }

    async fn remove(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        self.inner.remove(collection, id).await
    }

    async fn find(&self, collection: &str, query: &Query) -> Result<Vec<Record>, StoreError> {
        self.inner.find(collection, query).await
    }

    async fn count(&self, collection: &str, query: &Query) -> Result<u64, StoreError> {
        self.inner.count(collection, query).await
    }

    async fn remove_where(&self, collection: &str, query: &Query) -> Result<u64, StoreError> {
        self.inner.remove_where(collection, query).await
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> Result<(), StoreError> {
        self.inner.increment(collection, id, field, delta).await
    }
}
