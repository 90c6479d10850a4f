//! In-memory reference backend.
//!
//! Ephemeral storage backed by a `HashMap` behind a `tokio::sync::Mutex`.
//! All data is lost when the store is dropped. Suitable for tests,
//! development, and benchmarking; production deployments implement
//! [`ResourceStore`] over a real database instead.

use super::ResourceStore;
use crate::domain::{Resource, ResourceId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Ephemeral [`ResourceStore`] implementation.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<ResourceId, Resource>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-load records, replacing any existing entries with the same ID.
    ///
    /// No graph validation happens here; corrupt imports surface later as
    /// `InvariantViolation` when a snapshot is loaded.
    pub async fn import(&self, resources: Vec<Resource>) {
        let mut records = self.records.lock().await;
        for resource in resources {
            records.insert(resource.id.clone(), resource);
        }
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn load_all(&self) -> Result<HashMap<ResourceId, Resource>> {
        Ok(self.records.lock().await.clone())
    }

    async fn apply_create(&self, resource: Resource) -> Result<()> {
        let mut records = self.records.lock().await;
        records.insert(resource.id.clone(), resource);
        Ok(())
    }

    async fn apply_update(&self, resource: Resource) -> Result<()> {
        let mut records = self.records.lock().await;
        records.insert(resource.id.clone(), resource);
        Ok(())
    }

    async fn apply_delete(&self, id: &ResourceId) -> Result<()> {
        let mut records = self.records.lock().await;
        records.remove(id);
        Ok(())
    }
}
