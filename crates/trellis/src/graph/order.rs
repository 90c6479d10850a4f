//! Topological ordering via Kahn's algorithm.
//!
//! Produces a linear order in which every resource appears after all of its
//! transitive prerequisites. Ties between simultaneously-ready nodes are
//! broken by ascending resource ID, so repeated calls on an unchanged
//! snapshot return byte-identical sequences.

use crate::domain::{OrderScope, ResourceId};
use crate::error::{Error, Result};
use crate::graph::components;
use crate::snapshot::GraphSnapshot;
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};
use tracing::error;

/// Order the requested scope of the snapshot.
///
/// # Errors
///
/// - `Error::NotFound` if the scope names an unknown resource
/// - `Error::InvariantViolation` if the stored graph contains a cycle.
///   Mutations are validated before persistence, so this indicates a bug
///   or corrupt data rather than bad input, and is never reported as a
///   validation failure.
pub fn topological_order(snapshot: &GraphSnapshot, scope: &OrderScope) -> Result<Vec<ResourceId>> {
    let ids: BTreeSet<ResourceId> = match scope {
        OrderScope::All => snapshot.ids().cloned().collect(),
        OrderScope::ComponentOf(id) => components::component_of(snapshot, id)?,
    };
    order_subset(snapshot, &ids)
}

/// Kahn's algorithm restricted to `ids`. Edges with an endpoint outside the
/// subset are ignored, which is what makes per-component and per-cascade
/// ordering work.
pub(crate) fn order_subset(
    snapshot: &GraphSnapshot,
    ids: &BTreeSet<ResourceId>,
) -> Result<Vec<ResourceId>> {
    // Unresolved-prerequisite counts, restricted to the subset.
    let mut remaining: HashMap<&ResourceId, usize> = HashMap::with_capacity(ids.len());
    for id in ids {
        let resource = snapshot
            .get(id)
            .ok_or_else(|| Error::NotFound(id.clone()))?;
        let degree = resource
            .dependencies
            .iter()
            .filter(|dep| ids.contains(*dep))
            .count();
        remaining.insert(id, degree);
    }

    // Min-heap on ID keeps tie-breaking deterministic.
    let mut ready: BinaryHeap<Reverse<&ResourceId>> = remaining
        .iter()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(&id, _)| Reverse(id))
        .collect();

    let mut order = Vec::with_capacity(ids.len());
    while let Some(Reverse(id)) = ready.pop() {
        order.push(id.clone());

        for dependent in snapshot.dependents_of(id) {
            let Some(key) = ids.get(&dependent) else {
                continue;
            };
            if let Some(degree) = remaining.get_mut(key) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(key));
                }
            }
        }
    }

    if order.len() != ids.len() {
        error!(
            expected = ids.len(),
            emitted = order.len(),
            "stored graph contains a cycle"
        );
        return Err(Error::InvariantViolation(format!(
            "topological order emitted {} of {} resources; the stored graph contains a cycle",
            order.len(),
            ids.len()
        )));
    }

    Ok(order)
}
