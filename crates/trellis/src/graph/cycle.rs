//! Cycle validation for proposed dependency sets.
//!
//! Given a snapshot, the resource being created or updated (the subject),
//! and its proposed dependency set, [`validate_dependencies`] decides
//! whether applying the set keeps the graph acyclic. The subject's existing
//! edges, if any, are treated as replaced by the proposal.
//!
//! The traversal is a three-coloring depth-first search (unvisited /
//! in-progress / done) over the prerequisites of each proposed dependency,
//! O(V+E). Reaching the subject closes a cycle through the new edge;
//! revisiting an in-progress node exposes a cycle already present in the
//! walked region. Either way the explicit cycle path is reported.

use crate::domain::ResourceId;
use crate::error::{Error, Result};
use crate::snapshot::GraphSnapshot;
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

enum Color {
    InProgress,
    Done,
}

/// Check that giving `subject` the dependency set `dependencies` keeps the
/// graph acyclic. `subject` may be absent from the snapshot (creation).
///
/// # Errors
///
/// - `Error::NotFound` for any proposed dependency absent from the snapshot
///   (checked first, so cycle detection can assume all nodes exist)
/// - `Error::CircularDependency` with the explicit cycle path
pub fn validate_dependencies(
    snapshot: &GraphSnapshot,
    subject: &ResourceId,
    dependencies: &BTreeSet<ResourceId>,
) -> Result<()> {
    for dep in dependencies {
        // A resource naming itself is a degenerate cycle; no traversal needed.
        if dep == subject {
            warn!(resource = %subject, "self-dependency rejected");
            return Err(Error::CircularDependency {
                cycle: vec![subject.clone(), subject.clone()],
            });
        }
        if !snapshot.contains(dep) {
            return Err(Error::NotFound(dep.clone()));
        }
    }

    let mut colors: HashMap<ResourceId, Color> = HashMap::new();
    let mut path: Vec<ResourceId> = Vec::new();

    for dep in dependencies {
        if let Some(cycle) = visit(snapshot, subject, dep, &mut colors, &mut path) {
            warn!(resource = %subject, len = cycle.len(), "cycle rejected");
            return Err(Error::CircularDependency { cycle });
        }
    }

    Ok(())
}

/// DFS step. Returns the closing cycle path if one is found.
///
/// `path` holds the in-progress chain of prerequisites, excluding the
/// subject and excluding `current` until it has been entered.
fn visit(
    snapshot: &GraphSnapshot,
    subject: &ResourceId,
    current: &ResourceId,
    colors: &mut HashMap<ResourceId, Color>,
    path: &mut Vec<ResourceId>,
) -> Option<Vec<ResourceId>> {
    if current == subject {
        // The new edge subject -> path[0] plus this chain closes a cycle.
        let mut cycle = Vec::with_capacity(path.len() + 2);
        cycle.push(subject.clone());
        cycle.extend(path.iter().cloned());
        cycle.push(subject.clone());
        return Some(cycle);
    }

    match colors.get(current) {
        Some(Color::Done) => return None,
        Some(Color::InProgress) => {
            // Cycle within the walked region itself.
            let start = path.iter().position(|id| id == current).unwrap_or(0);
            let mut cycle = path[start..].to_vec();
            cycle.push(current.clone());
            return Some(cycle);
        }
        None => {}
    }

    colors.insert(current.clone(), Color::InProgress);
    path.push(current.clone());

    if let Some(resource) = snapshot.get(current) {
        for next in &resource.dependencies {
            if let Some(cycle) = visit(snapshot, subject, next, colors, path) {
                return Some(cycle);
            }
        }
    }

    path.pop();
    colors.insert(current.clone(), Color::Done);
    None
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

    fn deps(ids: &[&str]) -> BTreeSet<ResourceId> {
        ids.iter().map(|id| ResourceId::new(*id)).collect()
    }

    #[test]
    fn valid_chain_is_accepted() {
        let snap = snapshot(vec![resource("a", &[]), resource("b", &["a"])]);
        validate_dependencies(&snap, &ResourceId::new("c"), &deps(&["b"])).unwrap();
    }

    #[test]
    fn closing_edge_reports_exact_path() {
        // b depends on a; giving a the dependency b closes a -> b -> a.
        let snap = snapshot(vec![resource("a", &[]), resource("b", &["a"])]);
        let err =
            validate_dependencies(&snap, &ResourceId::new("a"), &deps(&["b"])).unwrap_err();
        match err {
            Error::CircularDependency { cycle } => {
                assert_eq!(
                    cycle,
                    vec![ResourceId::new("a"), ResourceId::new("b"), ResourceId::new("a")]
                );
            }
            other => panic!("expected CircularDependency, got {other:?}"),
        }
    }

    #[test]
    fn missing_dependency_fails_before_traversal() {
        let snap = snapshot(vec![resource("a", &[])]);
        let err =
            validate_dependencies(&snap, &ResourceId::new("b"), &deps(&["ghost"])).unwrap_err();
        assert!(matches!(err, Error::NotFound(id) if id == ResourceId::new("ghost")));
    }

    #[test]
    fn self_dependency_is_a_degenerate_cycle() {
        let snap = snapshot(vec![resource("a", &[])]);
        let err = validate_dependencies(&snap, &ResourceId::new("a"), &deps(&["a"])).unwrap_err();
        assert!(matches!(err, Error::CircularDependency { cycle } if cycle.len() == 2));
    }
}
