//! Trellis - a dependency-graph engine for resource stores.
//!
//! This crate is the graph core of a CRUD service that stores "resources"
//! with declared prerequisite relationships. It keeps the stored resource
//! set a valid directed acyclic graph, computes safe mutation and deletion
//! orders, and partitions resources into independent components for display.
//!
//! Persistence is delegated to a [`store::ResourceStore`] collaborator; the
//! engine owns validation, planning, and the single-writer discipline that
//! makes load-validate-apply atomic with respect to other mutations.

#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod graph;
pub mod id_generation;
pub mod snapshot;
pub mod store;

pub use config::EngineConfig;
pub use domain::{DeletionPlan, NewResource, OrderScope, Resource, ResourceId};
pub use engine::GraphEngine;
pub use error::{Error, Result};
pub use snapshot::GraphSnapshot;
