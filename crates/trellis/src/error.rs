//! Error types for the graph engine.
//!
//! `NotFound`, `CircularDependency`, and `HasDependents` are expected
//! validation outcomes and are returned to callers. `InvariantViolation`
//! means the stored graph itself is corrupt and is logged at error severity
//! where it is detected. `Busy` is retryable lock contention.

use crate::domain::ResourceId;
use crate::id_generation::IdGenerationError;
use thiserror::Error;

/// The error type for graph engine operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A referenced resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(ResourceId),

    /// Applying the proposed dependencies would close a cycle.
    ///
    /// `cycle` is the walk that closes the cycle, in order, with the first
    /// and last entry being the same resource.
    #[error("circular dependency: {}", format_cycle(.cycle))]
    CircularDependency { cycle: Vec<ResourceId> },

    /// Deletion without cascade was requested for a resource that still
    /// has dependents. Carries the direct dependents only.
    #[error("resource {id} has {} direct dependent(s)", .dependents.len())]
    HasDependents {
        id: ResourceId,
        dependents: Vec<ResourceId>,
    },

    /// The stored graph violates the DAG or referential-integrity
    /// invariant. This is data corruption, not bad input: mutations are
    /// validated before persistence, so a non-DAG store means a bug
    /// upstream of the engine or a damaged store.
    #[error("graph invariant violated: {0}")]
    InvariantViolation(String),

    /// The mutation lock could not be acquired within the configured
    /// timeout. Retryable with backoff.
    #[error("graph engine busy: mutation lock not acquired in time")]
    Busy,

    /// The persistence collaborator could not be read or written.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// ID generation failed.
    #[error(transparent)]
    IdGeneration(#[from] IdGenerationError),
}

/// A specialized Result type for graph engine operations.
pub type Result<T> = std::result::Result<T, Error>;

fn format_cycle(cycle: &[ResourceId]) -> String {
    cycle
        .iter()
        .map(ResourceId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
