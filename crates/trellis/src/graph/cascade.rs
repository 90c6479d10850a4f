//! Cascade-deletion planning.
//!
//! Computes the transitive set of resources that must be removed together
//! with a deletion target, and a removal order that stays safe if the plan
//! is applied incrementally: dependents first, target last, so no resource
//! is ever removed while something still depending on it remains.

use crate::domain::{DeletionPlan, ResourceId};
use crate::error::{Error, Result};
use crate::graph::order;
use crate::snapshot::GraphSnapshot;
use std::collections::{BTreeSet, VecDeque};
use tracing::debug;

/// Plan the deletion of `target`.
///
/// With `cascade` the plan covers the target plus every transitive
/// dependent, ordered by reverse topological order restricted to that set.
/// Without it, a target that has any dependents is rejected.
///
/// Planning has no side effects; applying the plan belongs to the caller.
///
/// # Errors
///
/// - `Error::NotFound` if the target does not exist
/// - `Error::HasDependents` when `cascade` is false and dependents exist,
///   carrying the direct dependents only (not the transitive set)
pub fn plan_deletion(
    snapshot: &GraphSnapshot,
    target: &ResourceId,
    cascade: bool,
) -> Result<DeletionPlan> {
    if !snapshot.contains(target) {
        return Err(Error::NotFound(target.clone()));
    }

    if !cascade {
        let direct = snapshot.dependents_of(target);
        if !direct.is_empty() {
            return Err(Error::HasDependents {
                id: target.clone(),
                dependents: direct,
            });
        }
        return Ok(DeletionPlan {
            order: vec![target.clone()],
        });
    }

    // Transitive closure of "depends on target" over reverse adjacency.
    // Discovery order is irrelevant; only the set matters.
    let mut doomed: BTreeSet<ResourceId> = BTreeSet::from([target.clone()]);
    let mut queue: VecDeque<ResourceId> = VecDeque::from([target.clone()]);
    while let Some(id) = queue.pop_front() {
        for dependent in snapshot.dependents_of(&id) {
            if doomed.insert(dependent.clone()) {
                queue.push_back(dependent);
            }
        }
    }

    // Deepest dependents first, target last.
    let mut removal = order::order_subset(snapshot, &doomed)?;
    removal.reverse();

    debug!(target = %target, total = removal.len(), "computed cascade deletion plan");
    Ok(DeletionPlan { order: removal })
}
