//! Persistence collaborator abstraction.
//!
//! The engine never talks to a database directly: it consumes this trait.
//! `load_all` materializes the full resource universe for a snapshot; the
//! `apply_*` methods are idempotent per-ID primitives that the engine
//! invokes in the order its validators and planners dictate.
//!
//! The trait is object-safe (`Arc<dyn ResourceStore>`) and uses
//! `async_trait` so that both in-process backends and truly async database
//! backends can implement it.

use crate::domain::{Resource, ResourceId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub mod memory;

pub use memory::MemoryStore;

/// Durable record store the engine plans against.
///
/// # Error Handling
///
/// Implementations report read/write failures as `Error::StoreUnavailable`.
/// They perform no graph validation of their own; acyclicity and referential
/// integrity are enforced by the engine before any `apply_*` call is made.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Read the entire resource universe.
    ///
    /// All-or-nothing: on failure the caller receives an error, never a
    /// partially materialized mapping.
    async fn load_all(&self) -> Result<HashMap<ResourceId, Resource>>;

    /// Persist a newly created resource. Idempotent per ID.
    async fn apply_create(&self, resource: Resource) -> Result<()>;

    /// Replace the stored record for an existing resource.
    async fn apply_update(&self, resource: Resource) -> Result<()>;

    /// Remove a single resource record.
    ///
    /// Deleting an absent ID succeeds, so an interrupted cascade can be
    /// resumed by re-applying its plan from the start.
    async fn apply_delete(&self, id: &ResourceId) -> Result<()>;
}
