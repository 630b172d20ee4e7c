// src/report/mod.rs

//! Read-only graph reporting.
//!
//! Renders already-computed edge sets for visualization. Nothing here
//! feeds back into planning or orchestration.

use std::collections::{HashSet, VecDeque};

use crate::graph::{DepGraph, NodeId};

pub mod dot;

pub use dot::DotRenderer;

/// All `(parent, child)` edges in the ancestor closure of `id`,
/// deduplicated, in discovery order.
pub fn ancestor_edges(graph: &DepGraph, id: NodeId) -> Vec<(NodeId, NodeId)> {
    collect_edges(graph, id, |g, n| g.parents(n, 0), |other, node| (other, node))
}

/// All `(parent, child)` edges in the descendant closure of `id`.
pub fn descendant_edges(graph: &DepGraph, id: NodeId) -> Vec<(NodeId, NodeId)> {
    collect_edges(graph, id, |g, n| g.children(n, 0), |other, node| (node, other))
}

fn collect_edges(
    graph: &DepGraph,
    id: NodeId,
    next: impl Fn(&DepGraph, NodeId) -> Vec<NodeId>,
    orient: impl Fn(NodeId, NodeId) -> (NodeId, NodeId),
) -> Vec<(NodeId, NodeId)> {
    let mut edges: Vec<(NodeId, NodeId)> = Vec::new();
    let mut seen: HashSet<NodeId> = HashSet::from([id]);
    let mut queue: VecDeque<NodeId> = VecDeque::from([id]);

    while let Some(node) = queue.pop_front() {
        for other in next(graph, node) {
            let edge = orient(other, node);
            if !edges.contains(&edge) {
                edges.push(edge);
            }
            if seen.insert(other) {
                queue.push_back(other);
            }
        }
    }
    edges
}
