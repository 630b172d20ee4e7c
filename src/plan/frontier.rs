// src/plan/frontier.rs

//! Lazy frontier planner.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::errors::{FiledagError, Result};
use crate::graph::{DepGraph, NodeId};
use crate::plan::{older_than_existing_parent, BuildStep, Reason};

/// Compute the set of datasets that can be built *right now* toward
/// `target`, given current filesystem state.
///
/// The returned steps are necessary but not necessarily sufficient: callers
/// are expected to build the yielded steps and then call `build_next` again,
/// repeating until it returns nothing, since every call is a fresh snapshot
/// of disk state. Nodes in `ignore` are treated as already built and never
/// yielded.
///
/// The walk starts from the target's roots and descends breadth-first
/// through the ancestor closure. A child with any missing direct parent is
/// deferred; it will be reached again on a later call, once the branch that
/// produces the parent has been resolved. A child that exists and is not
/// older than any parent is itself a resolved branch and the walk continues
/// below it. The target is never part of its own frontier; the orchestrator
/// handles it once the frontier drains.
///
/// A root that does not exist on disk makes the build unsatisfiable: no
/// action can produce a parentless node, so this fails eagerly instead of
/// yielding an empty frontier that would look complete.
pub fn build_next(graph: &DepGraph, target: NodeId, ignore: &[NodeId]) -> Result<Vec<BuildStep>> {
    let ancestors: HashSet<NodeId> = graph.parents(target, -1).into_iter().collect();
    let roots = graph.roots(target);

    for root in &roots {
        if !graph.exists(*root) {
            return Err(FiledagError::BuildUnsatisfiable {
                node: graph.name(*root).to_string(),
            });
        }
    }

    let mut emitted: HashSet<NodeId> = ignore.iter().copied().collect();
    let mut queued: HashSet<NodeId> = roots.iter().copied().collect();
    let mut branches: VecDeque<NodeId> = roots.into();
    let mut out: Vec<BuildStep> = Vec::new();

    while let Some(stem) = branches.pop_front() {
        for child in graph.children(stem, 0) {
            if !ancestors.contains(&child) {
                continue;
            }

            let parents = graph.parents(child, 0);
            if parents.iter().any(|p| !graph.exists(*p)) {
                // The branch responsible for that parent has not resolved
                // yet; this path is revisited on a later call.
                trace!(child = graph.name(child), "deferring: parent missing");
                continue;
            }

            if !graph.exists(child) {
                if emitted.insert(child) {
                    out.push(BuildStep { node: child, reason: Reason::Missing });
                }
            } else if older_than_existing_parent(graph, child)? {
                if emitted.insert(child) {
                    out.push(BuildStep { node: child, reason: Reason::ParentNewer });
                }
            } else if queued.insert(child) {
                // Fresh: this child is a resolved branch, keep walking down.
                branches.push_back(child);
            }
        }
    }

    debug!(
        dataset = graph.name(target),
        steps = out.len(),
        "computed build frontier"
    );
    Ok(out)
}
