// src/engine/dispatch.rs

//! Dispatch loop and worker pool.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::engine::supervisor::run_supervisor;
use crate::engine::{BuildOptions, BuildReport, FailurePolicy, Signal, StepMsg};
use crate::errors::{FiledagError, Result};
use crate::exec::Delegator;
use crate::graph::{DepGraph, NodeId};
use crate::plan::BuildStep;

/// Outcome of one step after all permitted attempts.
#[derive(Debug)]
struct StepOutcome {
    node: NodeId,
    attempts: u32,
    status: StepStatus,
}

#[derive(Debug)]
enum StepStatus {
    Succeeded,
    /// All permitted attempts used without success.
    Exhausted,
    /// A failure that must abort the whole orchestration.
    Fatal(FiledagError),
}

/// Drive `delegator` over the dependency-respecting plan until `target` is
/// current.
///
/// Spawns the supervisor task, then loops: completed steps are joined and
/// recorded, and new steps are accepted from the `steps` queue and spawned
/// onto the worker pool (bounded by `options.workers` concurrent builds).
/// When more than 5× the pool size is in flight the loop stops accepting
/// new steps until completions bring the count down, bounding memory when
/// build actions are slower than plan recomputation.
///
/// The call returns once the supervisor's sentinel has been observed and
/// all in-flight work has completed, or earlier on a failure under the
/// `Raise` policy, in which case already-dispatched work is drained (never
/// forcibly terminated) before the error is returned.
pub async fn orchestrate(
    graph: Arc<DepGraph>,
    target: NodeId,
    delegator: Arc<dyn Delegator>,
    options: BuildOptions,
) -> Result<BuildReport> {
    // Invalid graphs are rejected before any side effect.
    graph.check_acyclic(target)?;

    let workers = options.workers.max(1);
    let max_in_flight = 5 * workers;

    let (steps_tx, mut steps_rx) = mpsc::channel::<StepMsg>(64);
    let (signals_tx, signals_rx) = mpsc::unbounded_channel::<Signal>();

    let supervisor = tokio::spawn(run_supervisor(
        Arc::clone(&graph),
        target,
        steps_tx,
        signals_rx,
        options.poll_interval,
        options.ignore.clone(),
    ));

    info!(
        dataset = graph.name(target),
        workers,
        max_attempts = options.max_attempts,
        "orchestration started"
    );

    let semaphore = Arc::new(Semaphore::new(workers));
    let mut in_flight: JoinSet<StepOutcome> = JoinSet::new();
    let mut attempts: HashMap<NodeId, u32> = HashMap::new();
    let mut exhausted: Vec<NodeId> = Vec::new();
    let mut done = false;
    let mut fatal: Option<FiledagError> = None;

    while !(done && in_flight.is_empty()) && fatal.is_none() {
        tokio::select! {
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                match joined {
                    Ok(outcome) => {
                        attempts.insert(outcome.node, outcome.attempts);
                        match outcome.status {
                            StepStatus::Succeeded => {}
                            StepStatus::Exhausted => {
                                if options.on_failure == FailurePolicy::Raise {
                                    fatal = Some(FiledagError::StepFailed {
                                        node: graph.name(outcome.node).to_string(),
                                        attempts: outcome.attempts,
                                        source: anyhow::anyhow!(
                                            "step gave up without a successful attempt"
                                        ),
                                    });
                                } else {
                                    warn!(
                                        node = graph.name(outcome.node),
                                        attempts = outcome.attempts,
                                        "step exhausted its attempts"
                                    );
                                    exhausted.push(outcome.node);
                                    let _ = signals_tx.send(Signal::StepExhausted(outcome.node));
                                }
                            }
                            StepStatus::Fatal(err) => fatal = Some(err),
                        }
                    }
                    Err(join_err) => fatal = Some(FiledagError::Other(join_err.into())),
                }
            }
            msg = steps_rx.recv(), if !done && in_flight.len() < max_in_flight => {
                match msg {
                    Some(StepMsg::Step(step)) => {
                        debug!(
                            node = graph.name(step.node),
                            reason = %step.reason,
                            "dispatching step to worker pool"
                        );
                        in_flight.spawn(run_step(
                            Arc::clone(&graph),
                            Arc::clone(&delegator),
                            Arc::clone(&semaphore),
                            step,
                            options.max_attempts,
                            options.on_failure,
                        ));
                    }
                    Some(StepMsg::Done) | None => done = true,
                }
            }
        }
    }

    // Ask the supervisor to stop and unblock it if it is mid-send, then
    // drain whatever was already dispatched.
    let _ = signals_tx.send(Signal::Quit);
    drop(steps_rx);

    while let Some(joined) = in_flight.join_next().await {
        if let Ok(outcome) = joined {
            attempts.insert(outcome.node, outcome.attempts);
        }
    }

    match supervisor.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => fatal = fatal.or(Some(err)),
        Err(join_err) => fatal = fatal.or(Some(FiledagError::Other(join_err.into()))),
    }

    if let Some(err) = fatal {
        return Err(err);
    }

    info!(
        dataset = graph.name(target),
        steps = attempts.len(),
        exhausted = exhausted.len(),
        "orchestration finished"
    );

    Ok(BuildReport {
        attempts: attempts
            .into_iter()
            .map(|(node, n)| (graph.name(node).to_string(), n))
            .collect(),
        exhausted: exhausted
            .into_iter()
            .map(|node| graph.name(node).to_string())
            .collect(),
    })
}

/// Run a single step on the worker pool: acquire a worker permit, then
/// invoke the delegator up to `max_attempts` times, applying the failure
/// policy on each failed attempt.
async fn run_step(
    graph: Arc<DepGraph>,
    delegator: Arc<dyn Delegator>,
    semaphore: Arc<Semaphore>,
    step: BuildStep,
    max_attempts: u32,
    policy: FailurePolicy,
) -> StepOutcome {
    let _permit = match Arc::clone(&semaphore).acquire_owned().await {
        Ok(permit) => permit,
        Err(closed) => {
            return StepOutcome {
                node: step.node,
                attempts: 0,
                status: StepStatus::Fatal(FiledagError::Other(closed.into())),
            };
        }
    };

    let mut attempts = 0u32;
    while attempts < max_attempts {
        attempts += 1;
        match delegator.build(Arc::clone(&graph), step.node, step.reason).await {
            Ok(()) => {
                debug!(node = graph.name(step.node), attempts, "build step succeeded");
                return StepOutcome {
                    node: step.node,
                    attempts,
                    status: StepStatus::Succeeded,
                };
            }
            Err(err) => match policy {
                FailurePolicy::Raise => {
                    return StepOutcome {
                        node: step.node,
                        attempts,
                        status: StepStatus::Fatal(FiledagError::StepFailed {
                            node: graph.name(step.node).to_string(),
                            attempts,
                            source: err.into(),
                        }),
                    };
                }
                FailurePolicy::Print => {
                    error!(
                        node = graph.name(step.node),
                        attempt = attempts,
                        error = %err,
                        "build step failed"
                    );
                }
                FailurePolicy::Ignore => {}
            },
        }
    }

    StepOutcome {
        node: step.node,
        attempts,
        status: StepStatus::Exhausted,
    }
}
