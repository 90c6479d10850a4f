//! Point-in-time graph snapshots.
//!
//! A [`GraphSnapshot`] is the unit every algorithm operates on: the full
//! resource mapping plus a derived petgraph adjacency. Snapshots are built
//! fresh from the store per operation and never mutated in place; algorithms
//! read them and return new facts (a verdict, an order, a plan).
//!
//! # Edge Direction Convention
//!
//! Edges point from **dependent to prerequisite**: `source -> target` means
//! the source resource requires the target. A resource's dependents are
//! therefore its incoming edges; they are always derived, never stored.

use crate::domain::{Resource, ResourceId};
use crate::error::{Error, Result};
use crate::store::ResourceStore;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::{debug, error};

/// Immutable point-in-time view of the resource graph.
pub struct GraphSnapshot {
    /// Resources indexed by ID for O(1) lookups
    resources: HashMap<ResourceId, Resource>,

    /// Derived adjacency. Edge direction: dependent -> prerequisite.
    graph: DiGraph<ResourceId, ()>,

    /// Mapping from ResourceId to graph NodeIndex
    node_map: HashMap<ResourceId, NodeIndex>,
}

impl GraphSnapshot {
    /// Load the full resource universe from the store.
    ///
    /// All-or-nothing: a store read failure surfaces as
    /// `StoreUnavailable` and a dependency edge naming an ID absent from
    /// the mapping means the durable data is already corrupt, which fails
    /// with `InvariantViolation`. A partial snapshot is never produced.
    pub async fn load(store: &dyn ResourceStore) -> Result<Self> {
        let resources = store.load_all().await?;
        let snapshot = Self::from_resources(resources)?;
        debug!(
            resources = snapshot.len(),
            edges = snapshot.graph.edge_count(),
            "loaded graph snapshot"
        );
        Ok(snapshot)
    }

    /// Build a snapshot from an already-materialized mapping.
    pub fn from_resources(resources: HashMap<ResourceId, Resource>) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::with_capacity(resources.len());

        for id in resources.keys() {
            let node = graph.add_node(id.clone());
            node_map.insert(id.clone(), node);
        }

        for (id, resource) in &resources {
            for dep in &resource.dependencies {
                let Some(&to) = node_map.get(dep) else {
                    error!(resource = %id, missing = %dep, "dangling dependency in store");
                    return Err(Error::InvariantViolation(format!(
                        "resource {id} depends on missing resource {dep}"
                    )));
                };
                graph.add_edge(node_map[id], to, ());
            }
        }

        Ok(Self {
            resources,
            graph,
            node_map,
        })
    }

    /// Number of resources in the snapshot.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.resources.contains_key(id)
    }

    pub fn get(&self, id: &ResourceId) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Iterate over all resource IDs (unordered).
    pub fn ids(&self) -> impl Iterator<Item = &ResourceId> {
        self.resources.keys()
    }

    /// Iterate over all resources (unordered).
    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    /// Direct dependents of `id` (resources whose dependency set contains
    /// it), ascending by ID. Empty for unknown IDs.
    pub fn dependents_of(&self, id: &ResourceId) -> Vec<ResourceId> {
        let Some(&node) = self.node_map.get(id) else {
            return Vec::new();
        };
        let mut dependents: Vec<ResourceId> = self
            .graph
            .neighbors_directed(node, Direction::Incoming)
            .map(|n| self.graph[n].clone())
            .collect();
        dependents.sort();
        dependents
    }

    pub(crate) fn node(&self, id: &ResourceId) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    pub(crate) fn graph(&self) -> &DiGraph<ResourceId, ()> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn resource(id: &str, deps: &[&str]) -> Resource {
        Resource {
            id: ResourceId::new(id),
            name: id.to_string(),
            description: String::new(),
            dependencies: deps.iter().map(|d| ResourceId::new(*d)).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn mapping(resources: Vec<Resource>) -> HashMap<ResourceId, Resource> {
        resources.into_iter().map(|r| (r.id.clone(), r)).collect()
    }

    #[test]
    fn builds_adjacency_from_dependency_sets() {
        let snapshot = GraphSnapshot::from_resources(mapping(vec![
            resource("a", &[]),
            resource("b", &["a"]),
            resource("c", &["a", "b"]),
        ]))
        .unwrap();

        assert_eq!(snapshot.len(), 3);
        assert_eq!(
            snapshot.dependents_of(&ResourceId::new("a")),
            vec![ResourceId::new("b"), ResourceId::new("c")]
        );
        assert!(snapshot.dependents_of(&ResourceId::new("c")).is_empty());
    }

    #[test]
    fn dangling_dependency_is_an_invariant_violation() {
        let result = GraphSnapshot::from_resources(mapping(vec![resource("a", &["ghost"])]));
        assert!(matches!(result, Err(Error::InvariantViolation(_))));
    }

    #[test]
    fn empty_mapping_builds_empty_snapshot() {
        let snapshot = GraphSnapshot::from_resources(HashMap::new()).unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.dependents_of(&ResourceId::new("x")).is_empty());
    }
}
