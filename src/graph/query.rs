// src/graph/query.rs

//! Traversal queries and cycle detection over the node arena.

use std::collections::{HashMap, VecDeque};

use crate::errors::{FiledagError, Result};
use crate::graph::{DepGraph, NodeId};

/// Marker used by the cycle-detection walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

impl DepGraph {
    /// Ancestors of `id` reachable within `depth` additional edges.
    ///
    /// `depth = 0` returns direct parents only; a negative depth means
    /// unbounded (the full transitive closure). Each node appears exactly
    /// once, in discovery order, even under diamond-shaped graphs.
    pub fn parents(&self, id: NodeId, depth: i32) -> Vec<NodeId> {
        self.walk(id, depth, |g, n| g.direct_parents(n))
    }

    /// Descendants of `id` reachable within `depth` additional edges;
    /// symmetric to [`Self::parents`].
    pub fn children(&self, id: NodeId, depth: i32) -> Vec<NodeId> {
        self.walk(id, depth, |g, n| g.direct_children(n))
    }

    fn walk(
        &self,
        id: NodeId,
        depth: i32,
        next: impl Fn(&DepGraph, NodeId) -> Vec<NodeId>,
    ) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = Vec::new();
        let mut queue: VecDeque<(NodeId, i32)> = VecDeque::new();
        queue.push_back((id, depth));

        while let Some((node, remaining)) = queue.pop_front() {
            for step in next(self, node) {
                if step != id && !out.contains(&step) {
                    out.push(step);
                    if remaining != 0 {
                        queue.push_back((step, remaining - 1));
                    }
                }
            }
        }
        out
    }

    /// The parentless ancestors feeding `id`: its raw inputs.
    ///
    /// Each root appears exactly once regardless of how many distinct paths
    /// reach it. A node with no parents has no roots (it *is* raw input).
    pub fn roots(&self, id: NodeId) -> Vec<NodeId> {
        self.parents(id, -1)
            .into_iter()
            .filter(|p| self.direct_parents(*p).is_empty())
            .collect()
    }

    /// Whether the ancestor graph above `id` is free of cycles.
    pub fn is_acyclic(&self, id: NodeId) -> bool {
        self.check_acyclic(id).is_ok()
    }

    /// Cycle check returning a tagged result instead of a bare boolean:
    /// `Err(CircularDependency)` names a node on the offending cycle.
    ///
    /// Depth-first walk upward through parents with two markers. Meeting an
    /// in-progress node again means the walk re-entered its own call chain,
    /// i.e. a cycle; nodes are marked done as the walk unwinds. Purely a
    /// query, the graph is never mutated.
    pub fn check_acyclic(&self, id: NodeId) -> Result<()> {
        let mut marks: HashMap<NodeId, Mark> = HashMap::new();
        self.visit(id, &mut marks)
    }

    fn visit(&self, id: NodeId, marks: &mut HashMap<NodeId, Mark>) -> Result<()> {
        match marks.get(&id) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => {
                return Err(FiledagError::CircularDependency {
                    node: self.name(id).to_string(),
                });
            }
            None => {}
        }

        marks.insert(id, Mark::InProgress);
        for parent in self.direct_parents(id) {
            self.visit(parent, marks)?;
        }
        marks.insert(id, Mark::Done);
        Ok(())
    }
}
