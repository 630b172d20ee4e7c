// src/engine/mod.rs

//! Concurrent build orchestration.
//!
//! The orchestrator drives a caller-supplied [`crate::exec::Delegator`]
//! over the dependency-respecting plan:
//! - a single [`supervisor`] task repeatedly recomputes the lazy frontier
//!   and feeds new steps into the `steps` queue;
//! - the [`dispatch`] loop consumes steps, runs each on a bounded worker
//!   pool with retry and failure-policy semantics, and reports steps that
//!   exhausted their attempts back over the `signals` queue.
//!
//! The two sides share nothing but the queues: the supervisor owns the
//! `submitted` set, the dispatch loop owns attempt counts and in-flight
//! tracking. The graph itself is read-only for the whole orchestration;
//! only the filesystem changes, and the supervisor observes that purely by
//! re-planning.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::graph::NodeId;
use crate::plan::BuildStep;

pub mod dispatch;
pub mod supervisor;

pub use dispatch::orchestrate;

/// How the orchestrator reacts when a delegator invocation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Propagate the failure and abort orchestration (default).
    #[default]
    Raise,
    /// Log the failure and continue with the remaining steps.
    Print,
    /// Swallow the failure silently and continue.
    Ignore,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raise" => Ok(FailurePolicy::Raise),
            "print" => Ok(FailurePolicy::Print),
            "ignore" => Ok(FailurePolicy::Ignore),
            other => Err(format!(
                "invalid on_failure policy: {other} (expected \"raise\", \"print\" or \"ignore\")"
            )),
        }
    }
}

/// Tunables for a single `orchestrate` call.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Maximum times a step is attempted before giving up. With 0 the
    /// delegator is never invoked at all.
    pub max_attempts: u32,
    pub on_failure: FailurePolicy,
    /// Worker-pool size; defaults to host parallelism.
    pub workers: usize,
    /// How long the supervisor waits between frontier sweeps when no new
    /// steps appeared but outstanding ones remain unresolved.
    pub poll_interval: Duration,
    /// Nodes treated as already built, pre-seeding the frontier planner.
    pub ignore: Vec<NodeId>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            on_failure: FailurePolicy::Raise,
            workers: default_workers(),
            poll_interval: Duration::from_millis(100),
            ignore: Vec::new(),
        }
    }
}

pub(crate) fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Message on the `steps` queue, supervisor → dispatch loop.
#[derive(Debug, Clone, Copy)]
pub(crate) enum StepMsg {
    Step(BuildStep),
    /// Sentinel: the plan is exhausted, no further steps will arrive.
    Done,
}

/// Message on the `signals` queue, dispatch loop → supervisor.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Signal {
    /// A step used up all permitted attempts without succeeding; the
    /// supervisor should stop waiting for its file to appear.
    StepExhausted(NodeId),
    /// Cooperative shutdown request.
    Quit,
}

/// Per-node attempt bookkeeping, returned for inspection once an
/// orchestration completes without a fatal error.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Attempts used per node name, for every step that was dispatched.
    pub attempts: HashMap<String, u32>,
    /// Names of steps that exhausted their attempts without succeeding.
    pub exhausted: Vec<String>,
}
