//! The graph mutation coordinator and public engine API.
//!
//! [`GraphEngine`] is the serialization boundary around the graph
//! algorithms: every structural mutation (create, dependency update,
//! delete) runs its load-validate-apply sequence under a single write
//! lock, so concurrent writers always validate against a fully up-to-date
//! snapshot and can never jointly introduce a cycle from stale reads.
//!
//! Read-only operations (ordering, grouping, lookups) load their own
//! snapshots and never take the write lock, so they run fully in parallel
//! and never block writers.

use crate::config::EngineConfig;
use crate::domain::{DeletionPlan, NewResource, OrderScope, Resource, ResourceId};
use crate::error::{Error, Result};
use crate::graph::{cascade, components, cycle, order};
use crate::id_generation::IdGenerator;
use crate::snapshot::GraphSnapshot;
use crate::store::ResourceStore;
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Dependency-graph engine over a [`ResourceStore`] collaborator.
pub struct GraphEngine {
    store: Arc<dyn ResourceStore>,

    config: EngineConfig,

    /// Guards the load-validate-apply critical section of structural
    /// mutations. Held for the whole sequence and released on every exit
    /// path, including validation and persistence failures.
    write_lock: Mutex<()>,
}

impl std::fmt::Debug for GraphEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphEngine")
            .field("config", &self.config)
            .field("store", &"<dyn ResourceStore>")
            .finish()
    }
}

impl GraphEngine {
    pub fn new(store: Arc<dyn ResourceStore>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Engine with the default configuration.
    pub fn with_defaults(store: Arc<dyn ResourceStore>) -> Self {
        Self::new(store, EngineConfig::default())
    }

    /// Bounded wait for the mutation lock.
    async fn acquire_write(&self) -> Result<MutexGuard<'_, ()>> {
        match timeout(self.config.lock_timeout, self.write_lock.lock()).await {
            Ok(guard) => Ok(guard),
            Err(_) => {
                warn!(
                    timeout_ms = self.config.lock_timeout.as_millis() as u64,
                    "mutation lock wait timed out"
                );
                Err(Error::Busy)
            }
        }
    }

    // ========== Structural Mutations ==========

    /// Create a resource after validating referential integrity and
    /// acyclicity of its dependency set against the current graph.
    pub async fn create(&self, new_resource: NewResource) -> Result<Resource> {
        let _guard = self.acquire_write().await?;
        let snapshot = GraphSnapshot::load(self.store.as_ref()).await?;

        let mut generator = IdGenerator::with_existing(
            self.config.id_prefix.clone(),
            snapshot.ids().map(|id| id.as_str().to_string()),
        );
        let id = ResourceId::new(generator.generate(&new_resource.name, &new_resource.description)?);

        cycle::validate_dependencies(&snapshot, &id, &new_resource.dependencies)?;

        let now = Utc::now();
        let resource = Resource {
            id,
            name: new_resource.name,
            description: new_resource.description,
            dependencies: new_resource.dependencies,
            created_at: now,
            updated_at: now,
        };

        self.store.apply_create(resource.clone()).await?;
        debug!(id = %resource.id, deps = resource.dependencies.len(), "created resource");
        Ok(resource)
    }

    /// Replace a resource's dependency set.
    ///
    /// The proposal is validated as a whole against the current snapshot;
    /// the resource's existing edges do not constrain the new set.
    pub async fn update_dependencies(
        &self,
        id: &ResourceId,
        dependencies: BTreeSet<ResourceId>,
    ) -> Result<Resource> {
        let _guard = self.acquire_write().await?;
        let snapshot = GraphSnapshot::load(self.store.as_ref()).await?;

        let Some(existing) = snapshot.get(id) else {
            return Err(Error::NotFound(id.clone()));
        };

        cycle::validate_dependencies(&snapshot, id, &dependencies)?;

        let mut resource = existing.clone();
        resource.dependencies = dependencies;
        resource.updated_at = Utc::now();

        self.store.apply_update(resource.clone()).await?;
        debug!(id = %resource.id, deps = resource.dependencies.len(), "updated dependencies");
        Ok(resource)
    }

    /// Update a resource's name and/or description.
    ///
    /// Neither field carries graph semantics, but the write still goes
    /// through the coordinator so the record never races a concurrent
    /// structural mutation.
    pub async fn rename(
        &self,
        id: &ResourceId,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Resource> {
        let _guard = self.acquire_write().await?;
        let snapshot = GraphSnapshot::load(self.store.as_ref()).await?;

        let Some(existing) = snapshot.get(id) else {
            return Err(Error::NotFound(id.clone()));
        };

        let mut resource = existing.clone();
        if let Some(name) = name {
            resource.name = name;
        }
        if let Some(description) = description {
            resource.description = description;
        }
        resource.updated_at = Utc::now();

        self.store.apply_update(resource.clone()).await?;
        Ok(resource)
    }

    /// Delete a resource, cascading to its transitive dependents when
    /// requested, and apply the plan to the store.
    ///
    /// Records are removed one at a time in plan order (dependents first,
    /// target last). If an application step fails, nothing past the failure
    /// point is removed: every remaining resource still has all of its
    /// prerequisites present, and the operation can be retried.
    pub async fn delete(&self, id: &ResourceId, cascade: bool) -> Result<DeletionPlan> {
        let _guard = self.acquire_write().await?;
        let snapshot = GraphSnapshot::load(self.store.as_ref()).await?;

        let plan = cascade::plan_deletion(&snapshot, id, cascade)?;

        for (applied, doomed) in plan.order.iter().enumerate() {
            if let Err(err) = self.store.apply_delete(doomed).await {
                warn!(
                    target = %id,
                    applied,
                    total = plan.total(),
                    "cascade deletion interrupted; remaining graph is still valid"
                );
                return Err(err);
            }
        }

        debug!(target = %id, total = plan.total(), "deletion applied");
        Ok(plan)
    }

    // ========== Read-Only Operations ==========

    /// Plan a deletion without applying it.
    pub async fn plan_deletion(&self, id: &ResourceId, cascade: bool) -> Result<DeletionPlan> {
        let snapshot = GraphSnapshot::load(self.store.as_ref()).await?;
        cascade::plan_deletion(&snapshot, id, cascade)
    }

    /// Deterministic topological order of the requested scope.
    pub async fn compute_order(&self, scope: OrderScope) -> Result<Vec<ResourceId>> {
        let snapshot = GraphSnapshot::load(self.store.as_ref()).await?;
        order::topological_order(&snapshot, &scope)
    }

    /// Partition all resources into weakly-connected components.
    pub async fn compute_groups(&self) -> Result<Vec<Vec<ResourceId>>> {
        let snapshot = GraphSnapshot::load(self.store.as_ref()).await?;
        Ok(components::component_groups(&snapshot))
    }

    /// Look up a single resource.
    pub async fn get(&self, id: &ResourceId) -> Result<Option<Resource>> {
        let mut all = self.store.load_all().await?;
        Ok(all.remove(id))
    }

    /// All resources, ascending by ID.
    pub async fn list(&self) -> Result<Vec<Resource>> {
        let all = self.store.load_all().await?;
        let mut resources: Vec<Resource> = all.into_values().collect();
        resources.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(resources)
    }
}
