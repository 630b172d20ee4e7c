// tests/orchestrator_failure.rs

//! Failure-policy and retry semantics.

use std::error::Error;
use std::sync::Arc;

use filedag::engine::{orchestrate, BuildOptions, FailurePolicy};
use filedag::FiledagError;
use filedag_test_utils::delegators::{FailingDelegator, FlakyDelegator};
use filedag_test_utils::fixture::{makefile, FixtureGraph};
use filedag_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn seeded_fixture() -> Result<(tempfile::TempDir, FixtureGraph), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let fx = FixtureGraph::new(dir.path());
    for raw in [fx.raw0, fx.raw1, fx.raw2, fx.raw3] {
        makefile(fx.graph.name(raw));
    }
    Ok((dir, fx))
}

#[tokio::test]
async fn raise_policy_surfaces_the_failure_and_stops() -> TestResult {
    init_tracing();

    let (_dir, fx) = seeded_fixture()?;
    let delegator = FailingDelegator::new();
    let graph = Arc::new(fx.graph.clone());

    let result = with_timeout(orchestrate(
        Arc::clone(&graph),
        fx.dc0,
        Arc::new(delegator.clone()),
        BuildOptions::default(),
    ))
    .await;

    match result {
        Err(FiledagError::StepFailed { node, attempts, .. }) => {
            assert_eq!(attempts, 1);
            assert!(node.ends_with("da0") || node.ends_with("da1"));
        }
        other => panic!("expected StepFailed, got {other:?}"),
    }

    // Downstream steps were never reached, let alone built.
    assert_eq!(delegator.calls_for(graph.name(fx.db0)), 0);
    assert_eq!(delegator.calls_for(graph.name(fx.dc0)), 0);
    for node in [fx.da0, fx.da1, fx.db0, fx.db1, fx.dc0] {
        assert!(!graph.exists(node));
    }
    Ok(())
}

#[tokio::test]
async fn print_policy_retries_then_reports_exhausted_steps() -> TestResult {
    init_tracing();

    let (_dir, fx) = seeded_fixture()?;
    let delegator = FailingDelegator::new();
    let graph = Arc::new(fx.graph.clone());

    let report = with_timeout(orchestrate(
        Arc::clone(&graph),
        fx.dc0,
        Arc::new(delegator.clone()),
        BuildOptions {
            max_attempts: 3,
            on_failure: FailurePolicy::Print,
            ..BuildOptions::default()
        },
    ))
    .await?;

    // The first frontier (da0, da1) was attempted to exhaustion; nothing
    // behind it ever became reachable.
    for node in [fx.da0, fx.da1] {
        let name = graph.name(node);
        assert_eq!(report.attempts.get(name), Some(&3));
        assert_eq!(delegator.calls_for(name), 3);
        assert!(report.exhausted.contains(&name.to_string()));
    }
    assert_eq!(delegator.calls_for(graph.name(fx.db0)), 0);
    assert_eq!(delegator.calls_for(graph.name(fx.dc0)), 0);
    assert!(!graph.exists(fx.dc0));
    Ok(())
}

#[tokio::test]
async fn ignore_policy_behaves_like_print_without_logs() -> TestResult {
    init_tracing();

    let (_dir, fx) = seeded_fixture()?;
    let delegator = FailingDelegator::new();
    let graph = Arc::new(fx.graph.clone());

    let report = with_timeout(orchestrate(
        Arc::clone(&graph),
        fx.dc0,
        Arc::new(delegator.clone()),
        BuildOptions {
            max_attempts: 2,
            on_failure: FailurePolicy::Ignore,
            ..BuildOptions::default()
        },
    ))
    .await?;

    assert_eq!(report.exhausted.len(), 2);
    assert_eq!(delegator.calls_for(graph.name(fx.da0)), 2);
    Ok(())
}

#[tokio::test]
async fn transient_failures_are_retried_to_success() -> TestResult {
    init_tracing();

    let (_dir, fx) = seeded_fixture()?;
    let delegator = FlakyDelegator::new();
    let graph = Arc::new(fx.graph.clone());

    let report = with_timeout(orchestrate(
        Arc::clone(&graph),
        fx.dc0,
        Arc::new(delegator.clone()),
        BuildOptions {
            max_attempts: 2,
            on_failure: FailurePolicy::Print,
            ..BuildOptions::default()
        },
    ))
    .await?;

    for node in [fx.da0, fx.da1, fx.db0, fx.db1, fx.dc0] {
        let name = graph.name(node);
        assert!(graph.exists(node), "{name} missing after flaky build");
        assert_eq!(report.attempts.get(name), Some(&2));
    }
    assert!(report.exhausted.is_empty());
    Ok(())
}
