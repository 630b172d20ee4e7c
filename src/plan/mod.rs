// src/plan/mod.rs

//! Staleness planning.
//!
//! Two planners share the node model and traversal queries:
//! - [`frontier`] computes the lazy per-call frontier (`build_next`),
//!   intended to be re-queried between builds as files appear on disk.
//! - [`stages`] computes the global staged plan (`build_all`), a
//!   BFS-levelled sequence of stages safe to build concurrently.

use std::fmt;

use crate::errors::Result;
use crate::graph::{DepGraph, NodeId};

pub mod frontier;
pub mod stages;

pub use frontier::build_next;
pub use stages::build_all;

/// Why a dataset was selected for building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    /// A direct parent does not exist on disk.
    ParentMissing,
    /// The dataset exists but a parent is newer.
    ParentNewer,
    /// The dataset does not exist on disk.
    Missing,
    /// The dataset is the build target itself.
    IsTarget,
    /// The dataset is fresh, but the target is descended from it and an
    /// upstream rebuild will make it stale.
    Required,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let explanation = match self {
            Reason::ParentMissing => "the parent doesn't exist",
            Reason::ParentNewer => "the parent is newer than the child",
            Reason::Missing => "the child doesn't exist",
            Reason::IsTarget => "it is the target",
            Reason::Required => "the target is descended from it",
        };
        f.write_str(explanation)
    }
}

/// One unit of plannable work: a dataset and the reason it was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStep {
    pub node: NodeId,
    pub reason: Reason,
}

/// A set of steps with no dependency relation among them, safe to build
/// concurrently. Stage *i* must be fully resolved before stage *i + 1*.
pub type Stage = Vec<BuildStep>;

/// Whether `id` is older than at least one of its direct parents that is
/// present on disk. Missing parents are skipped here; the planners handle
/// them through their own defer/propagate rules.
pub(crate) fn older_than_existing_parent(graph: &DepGraph, id: NodeId) -> Result<bool> {
    for parent in graph.parents(id, 0) {
        if graph.exists(parent) && graph.is_older_than(id, parent)? {
            return Ok(true);
        }
    }
    Ok(false)
}
