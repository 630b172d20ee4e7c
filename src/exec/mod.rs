// src/exec/mod.rs

//! Pluggable build-action abstraction.
//!
//! The orchestrator never performs a real build itself; it calls a
//! [`Delegator`] supplied by the caller. This mirrors how the runtime talks
//! to an executor backend rather than spawning processes directly: tests
//! plug in delegators that touch files in a temp directory or fail on
//! purpose, production callers run whatever their pipeline step is.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::Result;
use crate::graph::{DepGraph, NodeId};
use crate::plan::Reason;

/// A caller-supplied build action for one dataset.
///
/// Contract:
/// - on success, the file(s) named by the dataset (every member, for a
///   group) must exist on disk as an observable side effect; the planner
///   only ever re-reads the filesystem, never the delegator's return value;
/// - it should be safe to invoke concurrently for unrelated datasets;
/// - it must be idempotent-safe, since a failing step is re-invoked up to
///   the configured number of attempts.
pub trait Delegator: Send + Sync {
    fn build(
        &self,
        graph: Arc<DepGraph>,
        node: NodeId,
        reason: Reason,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>>;
}
