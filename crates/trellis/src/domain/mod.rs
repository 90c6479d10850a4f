//! Domain types for the dependency-graph engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Unique identifier for a resource.
///
/// Ordered so that deterministic tie-breaking (topological order, group
/// ordering) can use ascending ID as the secondary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub String);

impl ResourceId {
    /// Create a new resource ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A stored resource: one node in the dependency graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique identifier, assigned at creation, immutable
    pub id: ResourceId,

    /// Resource name
    pub name: String,

    /// Free-text description, no graph semantics
    pub description: String,

    /// Direct prerequisites: the IDs this resource requires.
    ///
    /// Membership of `p` here implies the directed edge `(self.id, p)`.
    /// Every ID must name an existing resource and the overall edge set
    /// must remain acyclic; both are enforced before persistence.
    pub dependencies: BTreeSet<ResourceId>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a resource. The engine assigns the ID.
#[derive(Debug, Clone, Default)]
pub struct NewResource {
    /// Resource name
    pub name: String,

    /// Free-text description
    pub description: String,

    /// Direct prerequisites of the new resource
    pub dependencies: BTreeSet<ResourceId>,
}

/// Scope selector for topological ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderScope {
    /// Order every resource in the snapshot.
    All,

    /// Order only the weakly-connected component containing this resource.
    ComponentOf(ResourceId),
}

/// An ordered cascade-deletion plan.
///
/// `order` lists every resource to remove, deepest dependents first and the
/// deletion target last. Applying the plan front to back guarantees that a
/// partial failure leaves every remaining resource with all of its
/// prerequisites still present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionPlan {
    /// Removal order: dependents first, target last
    pub order: Vec<ResourceId>,
}

impl DeletionPlan {
    /// Total number of resources the plan removes.
    pub fn total(&self) -> usize {
        self.order.len()
    }

    /// The deletion target (always the last entry).
    pub fn target(&self) -> Option<&ResourceId> {
        self.order.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_id_display_and_ord() {
        let a = ResourceId::new("res-a1");
        let b = ResourceId::from("res-b2");
        assert_eq!(a.to_string(), "res-a1");
        assert!(a < b);
    }

    #[test]
    fn resource_serde_round_trip() {
        let resource = Resource {
            id: ResourceId::new("res-x"),
            name: "Example".to_string(),
            description: "A resource".to_string(),
            dependencies: [ResourceId::new("res-y")].into_iter().collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&resource).unwrap();
        let back: Resource = serde_json::from_str(&json).unwrap();
        assert_eq!(back, resource);
    }

    #[test]
    fn deletion_plan_target_is_last() {
        let plan = DeletionPlan {
            order: vec![ResourceId::new("c"), ResourceId::new("b"), ResourceId::new("a")],
        };
        assert_eq!(plan.total(), 3);
        assert_eq!(plan.target(), Some(&ResourceId::new("a")));
    }
}
