//! Weakly-connected component partitioning.
//!
//! Treats every dependency edge as undirected and groups resources into
//! disjoint components: independent dependency tracks that can be rendered
//! or processed separately. Groups are recomputed from the snapshot on
//! every call and never cached across mutations.

use crate::domain::ResourceId;
use crate::error::{Error, Result};
use crate::snapshot::GraphSnapshot;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Partition every resource into weakly-connected components.
///
/// Returns disjoint groups covering each resource exactly once, isolated
/// resources as singletons. Ordering is deterministic for stable display:
/// members ascend within each group, and groups are ordered by their
/// minimum ID.
pub fn component_groups(snapshot: &GraphSnapshot) -> Vec<Vec<ResourceId>> {
    let graph = snapshot.graph();

    let mut sets: UnionFind<usize> = UnionFind::new(graph.node_count());
    for edge in graph.edge_references() {
        sets.union(edge.source().index(), edge.target().index());
    }

    let mut groups: HashMap<usize, Vec<ResourceId>> = HashMap::new();
    for node in graph.node_indices() {
        groups
            .entry(sets.find(node.index()))
            .or_default()
            .push(graph[node].clone());
    }

    let mut out: Vec<Vec<ResourceId>> = groups
        .into_values()
        .map(|mut members| {
            members.sort();
            members
        })
        .collect();
    out.sort_by(|a, b| a.first().cmp(&b.first()));
    out
}

/// The members of the weakly-connected component containing `id`.
///
/// BFS over the undirected view of the edges.
pub fn component_of(snapshot: &GraphSnapshot, id: &ResourceId) -> Result<BTreeSet<ResourceId>> {
    let Some(start) = snapshot.node(id) else {
        return Err(Error::NotFound(id.clone()));
    };

    let graph = snapshot.graph();
    let mut members = BTreeSet::new();
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        members.insert(graph[node].clone());
        for next in graph.neighbors_undirected(node) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    Ok(members)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Resource;
    use chrono::Utc;
    use std::collections::HashMap;

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

    fn snapshot(resources: Vec<Resource>) -> GraphSnapshot {
        let mapping: HashMap<ResourceId, Resource> =
            resources.into_iter().map(|r| (r.id.clone(), r)).collect();
        GraphSnapshot::from_resources(mapping).unwrap()
    }

    #[test]
    fn disjoint_chains_form_separate_groups() {
        let snap = snapshot(vec![
            resource("x", &[]),
            resource("y", &["x"]),
            resource("p", &[]),
            resource("q", &["p"]),
            resource("r", &["q"]),
            resource("solo", &[]),
        ]);

        let groups = component_groups(&snap);
        assert_eq!(groups.len(), 3);
        // Ordered by minimum member: p.. < solo < x..
        assert_eq!(
            groups[0],
            vec![ResourceId::new("p"), ResourceId::new("q"), ResourceId::new("r")]
        );
        assert_eq!(groups[1], vec![ResourceId::new("solo")]);
        assert_eq!(groups[2], vec![ResourceId::new("x"), ResourceId::new("y")]);
    }

    #[test]
    fn direction_is_ignored_for_connectivity() {
        // a <- b -> c: weakly connected even though a and c share no path.
        let snap = snapshot(vec![
            resource("a", &[]),
            resource("b", &["a", "c"]),
            resource("c", &[]),
        ]);
        let members = component_of(&snap, &ResourceId::new("a")).unwrap();
        assert_eq!(members.len(), 3);
    }

    #[test]
    fn component_of_unknown_resource_fails() {
        let snap = snapshot(vec![resource("a", &[])]);
        let err = component_of(&snap, &ResourceId::new("ghost")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
