// src/plan/stages.rs

//! Global staged planner.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::errors::{FiledagError, Result};
use crate::graph::{DepGraph, NodeId};
use crate::plan::{older_than_existing_parent, BuildStep, Reason, Stage};

/// Compute a complete staged plan for `target`.
///
/// Each stage is a set of datasets with no dependency relation among them;
/// stage *i* must be fully resolved before stage *i + 1* is eligible.
/// Stages are ordered by longest-path distance from the roots: a node
/// reachable from several roots through paths of different lengths is
/// placed at the *maximum* distance, so it is never scheduled before its
/// slowest dependency chain completes.
///
/// A node is scheduled when it is missing from disk, when a direct parent
/// is missing, when it is older than an existing parent, or when a direct
/// parent was itself scheduled in an earlier stage (the rebuilt parent will
/// come out newer). If the target itself needs building, the plan ends with
/// a singleton stage containing it.
///
/// Fails with `CircularDependency` before any planning work if the
/// ancestor graph contains a cycle, and with `BuildUnsatisfiable` if a
/// parentless ancestor is missing from disk.
pub fn build_all(graph: &DepGraph, target: NodeId) -> Result<Vec<Stage>> {
    graph.check_acyclic(target)?;

    if !graph.exists(target) && graph.parents(target, 0).is_empty() {
        return Err(FiledagError::BuildUnsatisfiable {
            node: graph.name(target).to_string(),
        });
    }

    let ancestors: HashSet<NodeId> = graph.parents(target, -1).into_iter().collect();
    let roots = graph.roots(target);

    for root in &roots {
        if !graph.exists(*root) {
            return Err(FiledagError::BuildUnsatisfiable {
                node: graph.name(*root).to_string(),
            });
        }
    }

    // Longest-path leveling: breadth-first from all roots at once, keeping
    // the maximum distance at which each node is ever reached.
    let mut distance: HashMap<NodeId, usize> = roots.iter().map(|r| (*r, 0)).collect();
    let mut queue: VecDeque<NodeId> = roots.into();

    while let Some(node) = queue.pop_front() {
        let next = distance[&node] + 1;
        for child in graph.children(node, 0) {
            if child != target && !ancestors.contains(&child) {
                continue;
            }
            if distance.get(&child).is_none_or(|d| *d < next) {
                distance.insert(child, next);
                queue.push_back(child);
            }
        }
    }

    let mut by_level: Vec<(usize, NodeId)> = distance
        .iter()
        .filter(|(id, _)| **id != target)
        .map(|(id, d)| (*d, *id))
        .collect();
    by_level.sort();

    let mut scheduled: HashSet<NodeId> = HashSet::new();
    let mut stages: BTreeMap<usize, Stage> = BTreeMap::new();

    for (level, node) in by_level {
        if let Some(reason) = needs_build(graph, node, &scheduled)? {
            scheduled.insert(node);
            stages.entry(level).or_default().push(BuildStep { node, reason });
        }
    }

    let mut plan: Vec<Stage> = stages.into_values().collect();

    if needs_build(graph, target, &scheduled)?.is_some() {
        plan.push(vec![BuildStep { node: target, reason: Reason::IsTarget }]);
    }

    debug!(
        dataset = graph.name(target),
        stages = plan.len(),
        "computed staged plan"
    );
    Ok(plan)
}

/// Classify whether a node needs building, given the set of nodes already
/// scheduled in earlier stages. Parents always resolve before their
/// children here because nodes are visited in increasing stage order.
fn needs_build(
    graph: &DepGraph,
    node: NodeId,
    scheduled: &HashSet<NodeId>,
) -> Result<Option<Reason>> {
    let parents = graph.parents(node, 0);

    if !graph.exists(node) {
        // A missing node with no parents is unsatisfiable, but that is
        // caught at the roots check above; anything missing here is
        // producible.
        return Ok(Some(Reason::Missing));
    }
    if parents.iter().any(|p| !graph.exists(*p)) {
        return Ok(Some(Reason::ParentMissing));
    }
    if older_than_existing_parent(graph, node)? {
        return Ok(Some(Reason::ParentNewer));
    }
    if parents.iter().any(|p| scheduled.contains(p)) {
        return Ok(Some(Reason::Required));
    }
    Ok(None)
}
