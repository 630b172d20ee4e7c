// tests/planner_buildnext.rs

//! Lazy frontier planner, driven against the mock filesystem.

use std::path::Path;
use std::sync::Arc;

use filedag::fs::mock::MockFileSystem;
use filedag::plan::{build_next, Reason};
use filedag::{DepGraph, FiledagError, NodeId};
use filedag_test_utils::fixture::FixtureGraph;

fn fixture() -> (MockFileSystem, FixtureGraph) {
    let fs = MockFileSystem::new();
    let fx = FixtureGraph::with_fs(Path::new(""), Arc::new(fs.clone()));
    (fs, fx)
}

fn touch(fs: &MockFileSystem, fx: &FixtureGraph, ids: &[NodeId]) {
    for id in ids {
        fs.touch(fx.graph.name(*id));
    }
}

fn touch_raws(fs: &MockFileSystem, fx: &FixtureGraph) {
    touch(fs, fx, &[fx.raw0, fx.raw1, fx.raw2, fx.raw3]);
}

fn nodes(steps: &[filedag::BuildStep]) -> Vec<NodeId> {
    steps.iter().map(|s| s.node).collect()
}

#[test]
fn one_level_frontier() {
    let (fs, fx) = fixture();
    touch_raws(&fs, &fx);

    let steps = build_next(&fx.graph, fx.db0, &[]).unwrap();
    let to_build = nodes(&steps);

    assert!(to_build.contains(&fx.da0));
    assert!(to_build.contains(&fx.da1));
    assert_eq!(to_build.len(), 2);
    assert!(steps.iter().all(|s| s.reason == Reason::Missing));
}

#[test]
fn ignore_list_preseeds_the_output() {
    let (fs, fx) = fixture();
    touch_raws(&fs, &fx);

    let steps = build_next(&fx.graph, fx.db0, &[fx.da1]).unwrap();
    let to_build = nodes(&steps);

    assert!(to_build.contains(&fx.da0));
    assert!(!to_build.contains(&fx.da1));
    assert_eq!(to_build.len(), 1);
}

#[test]
fn frontier_advances_as_files_materialize() {
    let (fs, fx) = fixture();
    touch_raws(&fs, &fx);

    let steps = build_next(&fx.graph, fx.dc0, &[]).unwrap();
    let to_build = nodes(&steps);
    assert!(to_build.contains(&fx.da0));
    assert!(to_build.contains(&fx.da1));
    assert_eq!(to_build.len(), 2);

    touch(&fs, &fx, &[fx.da0, fx.da1]);

    let steps = build_next(&fx.graph, fx.dc0, &[]).unwrap();
    let to_build = nodes(&steps);
    assert!(to_build.contains(&fx.db0));
    assert!(to_build.contains(&fx.db1));
    assert_eq!(to_build.len(), 2);
}

#[test]
fn children_with_a_missing_parent_are_deferred() {
    // da1 and db1 exist, da0 and db0 do not. db0 cannot be submitted yet:
    // its parent da0 has to be produced by a later frontier first.
    let (fs, fx) = fixture();
    touch_raws(&fs, &fx);
    touch(&fs, &fx, &[fx.da1, fx.db1]);

    let steps = build_next(&fx.graph, fx.dc0, &[]).unwrap();
    assert_eq!(nodes(&steps), vec![fx.da0]);

    touch(&fs, &fx, &[fx.da0]);

    let steps = build_next(&fx.graph, fx.dc0, &[]).unwrap();
    assert_eq!(nodes(&steps), vec![fx.db0]);
}

#[test]
fn fresh_graph_yields_nothing() {
    let (fs, fx) = fixture();
    touch_raws(&fs, &fx);
    touch(&fs, &fx, &[fx.da0, fx.da1]);
    touch(&fs, &fx, &[fx.db0, fx.db1]);
    touch(&fs, &fx, &[fx.dc0]);

    let steps = build_next(&fx.graph, fx.dc0, &[]).unwrap();
    assert!(steps.is_empty());
}

#[test]
fn target_is_never_part_of_its_own_frontier() {
    let (fs, fx) = fixture();
    touch_raws(&fs, &fx);
    touch(&fs, &fx, &[fx.da0, fx.da1]);
    touch(&fs, &fx, &[fx.db0, fx.db1]);
    // dc0 itself is missing, but the frontier stops above the target.

    let steps = build_next(&fx.graph, fx.dc0, &[]).unwrap();
    assert!(steps.is_empty());
}

#[test]
fn stale_child_is_yielded_with_parent_newer() {
    let (fs, fx) = fixture();
    touch(&fs, &fx, &[fx.raw0, fx.raw1, fx.raw3]);
    touch(&fs, &fx, &[fx.da1]);
    // raw2 re-touched after da1: da1 is now older than its parent.
    touch(&fs, &fx, &[fx.raw2]);

    let steps = build_next(&fx.graph, fx.db1, &[]).unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].node, fx.da1);
    assert_eq!(steps[0].reason, Reason::ParentNewer);
}

#[test]
fn missing_root_is_unsatisfiable() {
    let (fs, fx) = fixture();
    touch(&fs, &fx, &[fx.raw1, fx.raw2, fx.raw3]);
    // raw0 does not exist and nothing can produce it.

    match build_next(&fx.graph, fx.dc0, &[]) {
        Err(FiledagError::BuildUnsatisfiable { node }) => {
            assert!(node.ends_with("raw0"));
        }
        other => panic!("expected BuildUnsatisfiable, got {other:?}"),
    }
}

#[test]
fn group_parent_gates_its_children() {
    let fs = MockFileSystem::new();
    let mut graph = DepGraph::with_fs(Arc::new(fs.clone()));

    let data = graph.add_dataset("raw/data.bin");
    let sidecar = graph.add_dataset("raw/data.meta");
    let group = graph.add_group("raw/data", vec![data, sidecar]);
    let product = graph.add_dataset("out/product");
    let target = graph.add_dataset("out/final");
    graph.depends_on(product, [group]);
    graph.depends_on(target, [product]);

    // Only half the group exists: the group root is judged missing.
    fs.touch("raw/data.bin");
    assert!(matches!(
        build_next(&graph, target, &[]),
        Err(FiledagError::BuildUnsatisfiable { .. })
    ));

    fs.touch("raw/data.meta");
    let steps = build_next(&graph, target, &[]).unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].node, product);
    assert_eq!(steps[0].reason, Reason::Missing);
}
