// src/graph/mod.rs

//! Dependency-graph node model.
//!
//! - [`arena`] owns every node. Nodes are addressed by opaque [`NodeId`]s and
//!   adjacency is stored as two index lists per node, so the graph has no
//!   ownership cycles and edges are always symmetric.
//! - [`query`] implements traversal (bounded and transitive parents/children,
//!   roots) and cycle detection on top of the arena.

pub mod arena;
pub mod query;

pub use arena::{DepGraph, NodeId};
