// src/engine/supervisor.rs

//! Supervisor task: sweeps the frontier planner and feeds the dispatch loop.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::engine::{Signal, StepMsg};
use crate::errors::Result;
use crate::graph::{DepGraph, NodeId};
use crate::plan::{self, BuildStep, Reason};

/// Repeatedly recompute `build_next(target)` and submit every step not yet
/// submitted, until a sweep finds nothing outstanding.
///
/// Once the plan is exhausted the target itself is checked: if it is still
/// missing or older than a direct parent it is enqueued as one final step.
/// A `Done` sentinel then tells the dispatch loop that no further steps
/// will arrive.
///
/// If a sweep submits nothing new but outstanding steps remain, other
/// workers are still producing files; the supervisor sleeps `poll_interval`
/// before looking again. Steps reported exhausted over `signals` are
/// treated as dead: when every outstanding step is dead the plan can never
/// complete and the supervisor gives up without the final target step.
pub(crate) async fn run_supervisor(
    graph: Arc<DepGraph>,
    target: NodeId,
    steps_tx: mpsc::Sender<StepMsg>,
    mut signals_rx: mpsc::UnboundedReceiver<Signal>,
    poll_interval: Duration,
    ignore: Vec<NodeId>,
) -> Result<()> {
    let mut submitted: HashSet<NodeId> = ignore.iter().copied().collect();
    let mut dead: HashSet<NodeId> = HashSet::new();
    let mut gave_up = false;

    'sweep: loop {
        loop {
            match signals_rx.try_recv() {
                Ok(Signal::Quit) => {
                    info!("supervisor received quit signal; stopping");
                    return Ok(());
                }
                Ok(Signal::StepExhausted(node)) => {
                    dead.insert(node);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }

        let frontier = plan::build_next(&graph, target, &ignore)?;
        let outstanding = frontier.len();
        let mut live = 0usize;
        let mut fresh = 0usize;

        for step in frontier {
            if !dead.contains(&step.node) {
                live += 1;
            }
            if submitted.insert(step.node) {
                debug!(
                    node = graph.name(step.node),
                    reason = %step.reason,
                    "supervisor submitting build step"
                );
                if steps_tx.send(StepMsg::Step(step)).await.is_err() {
                    // Dispatch loop is gone; nothing left to coordinate.
                    return Ok(());
                }
                fresh += 1;
            }
        }

        if outstanding == 0 {
            break 'sweep;
        }
        if live == 0 {
            warn!(
                dead = dead.len(),
                "every outstanding step has exhausted its attempts; giving up on the plan"
            );
            gave_up = true;
            break 'sweep;
        }
        if fresh == 0 {
            // Outstanding steps are still being built; wait for files to
            // appear, but wake immediately on a control signal.
            tokio::select! {
                _ = sleep(poll_interval) => {}
                sig = signals_rx.recv() => match sig {
                    Some(Signal::Quit) | None => return Ok(()),
                    Some(Signal::StepExhausted(node)) => {
                        dead.insert(node);
                    }
                },
            }
        }
    }

    if !gave_up {
        if let Some(step) = final_target_step(&graph, target)? {
            debug!(
                node = graph.name(step.node),
                reason = %step.reason,
                "supervisor submitting final target step"
            );
            let _ = steps_tx.send(StepMsg::Step(step)).await;
        }
    }

    let _ = steps_tx.send(StepMsg::Done).await;
    Ok(())
}

/// The frontier never contains the target; once it drains, decide whether
/// the target itself still needs building.
fn final_target_step(graph: &DepGraph, target: NodeId) -> Result<Option<BuildStep>> {
    if !graph.exists(target) {
        return Ok(Some(BuildStep { node: target, reason: Reason::Missing }));
    }
    for parent in graph.parents(target, 0) {
        if graph.exists(parent) && graph.is_older_than(target, parent)? {
            return Ok(Some(BuildStep { node: target, reason: Reason::ParentNewer }));
        }
    }
    Ok(None)
}
