// tests/cycle_detection.rs

//! Cycle detection is a pure predicate: true on DAGs, false whenever a
//! cycle is reachable above the queried node.

use filedag::{DepGraph, FiledagError, NodeId};

fn six_nodes(graph: &mut DepGraph) -> (NodeId, NodeId, NodeId, NodeId, NodeId, NodeId) {
    (
        graph.add_dataset("a"),
        graph.add_dataset("b"),
        graph.add_dataset("c"),
        graph.add_dataset("d"),
        graph.add_dataset("e"),
        graph.add_dataset("f"),
    )
}

#[test]
fn acyclic_tree_with_shared_ancestors() {
    let mut graph = DepGraph::new();
    let (a, b, c, d, e, f) = six_nodes(&mut graph);

    graph.depends_on(f, [d, e]);
    graph.depends_on(e, [b, c]);
    graph.depends_on(d, [b]);
    graph.depends_on(c, [a]);
    graph.depends_on(b, [a]);

    assert!(graph.is_acyclic(f));
}

#[test]
fn acyclic_with_cross_edge() {
    let mut graph = DepGraph::new();
    let (a, b, c, d, e, f) = six_nodes(&mut graph);

    graph.depends_on(f, [d, e]);
    graph.depends_on(e, [b, c]);
    graph.depends_on(d, [b]);
    graph.depends_on(c, [a, d]);
    graph.depends_on(b, [a]);

    assert!(graph.is_acyclic(f));
}

#[test]
fn cycle_through_the_queried_node() {
    let mut graph = DepGraph::new();
    let (a, b, c, d, e, f) = six_nodes(&mut graph);

    graph.depends_on(f, [d, e]);
    graph.depends_on(e, [b, c]);
    graph.depends_on(d, [b]);
    graph.depends_on(c, [a, f]);
    graph.depends_on(b, [a]);

    assert!(!graph.is_acyclic(f));
}

#[test]
fn cycle_above_the_queried_node() {
    let mut graph = DepGraph::new();
    let (a, b, c, d, e, f) = six_nodes(&mut graph);

    graph.depends_on(a, [f]);
    graph.depends_on(f, [d, e]);
    graph.depends_on(e, [b, c]);
    graph.depends_on(d, [b]);
    graph.depends_on(c, [a]);
    graph.depends_on(b, [a]);

    assert!(!graph.is_acyclic(f));
}

#[test]
fn check_acyclic_names_a_node_on_the_cycle() {
    let mut graph = DepGraph::new();
    let a = graph.add_dataset("a");
    let b = graph.add_dataset("b");

    graph.depends_on(a, [b]);
    graph.depends_on(b, [a]);

    match graph.check_acyclic(a) {
        Err(FiledagError::CircularDependency { node }) => {
            assert!(node == "a" || node == "b");
        }
        other => panic!("expected CircularDependency, got {other:?}"),
    }
}

#[test]
fn detection_does_not_mutate_the_graph() {
    let mut graph = DepGraph::new();
    let (a, b, c, d, e, f) = six_nodes(&mut graph);

    graph.depends_on(f, [d, e]);
    graph.depends_on(e, [b, c]);
    graph.depends_on(d, [b]);
    graph.depends_on(c, [a]);
    graph.depends_on(b, [a]);

    let parents_before = graph.parents(f, -1);
    assert!(graph.is_acyclic(f));
    assert!(graph.is_acyclic(f));
    assert_eq!(graph.parents(f, -1), parents_before);
}
