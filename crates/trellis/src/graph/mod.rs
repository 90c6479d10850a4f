//! Pure graph algorithms over snapshots.
//!
//! Every function here reads a [`crate::snapshot::GraphSnapshot`] and
//! returns a new fact: a validity verdict, an ordering, a deletion plan, or
//! a partition. Nothing in this module mutates state or touches the store.

pub mod cascade;
pub mod components;
pub mod cycle;
pub mod order;
