// tests/group_ages.rs

//! DatasetGroup existence and age semantics, against the mock filesystem's
//! synthetic clock.

use std::sync::Arc;

use filedag::fs::mock::MockFileSystem;
use filedag::DepGraph;

#[test]
fn group_is_older_when_all_members_predate_the_other() {
    let fs = MockFileSystem::new();
    let mut graph = DepGraph::with_fs(Arc::new(fs.clone()));

    let dep1a = graph.add_dataset("testdata/1a");
    let dep1b = graph.add_dataset("testdata/1b");
    let dep1c = graph.add_dataset("testdata/1c");
    let dep2a = graph.add_dataset("testdata/2a");
    let dep2b = graph.add_dataset("testdata/2b");
    let dep2c = graph.add_dataset("testdata/2c");

    fs.touch_all(["testdata/1a", "testdata/1b", "testdata/1c"]);
    fs.touch_all(["testdata/2a", "testdata/2b", "testdata/2c"]);

    let group1 = graph.add_group("testdata/1", vec![dep1a, dep1b, dep1c]);
    let group2 = graph.add_group("testdata/2", vec![dep2a, dep2b, dep2c]);

    assert!(graph.is_older_than(group1, group2).unwrap());
}

#[test]
fn overlapping_age_ranges_compare_as_not_older() {
    let fs = MockFileSystem::new();
    let mut graph = DepGraph::with_fs(Arc::new(fs.clone()));

    let dep1a = graph.add_dataset("testdata/1a");
    let dep1b = graph.add_dataset("testdata/1b");
    let dep1c = graph.add_dataset("testdata/1c");
    let dep2a = graph.add_dataset("testdata/2a");
    let dep2b = graph.add_dataset("testdata/2b");
    let dep2c = graph.add_dataset("testdata/2c");

    // Ages interleave: group 1 is not absolutely older than group 2.
    fs.touch_all(["testdata/1a", "testdata/1b", "testdata/2c"]);
    fs.touch_all(["testdata/1c", "testdata/2a", "testdata/2b"]);

    let group1 = graph.add_group("testdata/1", vec![dep1a, dep1b, dep1c]);
    let group2 = graph.add_group("testdata/2", vec![dep2a, dep2b, dep2c]);

    assert!(!graph.is_older_than(group1, group2).unwrap());
}

#[test]
fn group_compared_to_a_single_dataset() {
    let fs = MockFileSystem::new();
    let mut graph = DepGraph::with_fs(Arc::new(fs.clone()));

    let dep1a = graph.add_dataset("testdata/1a");
    let dep1b = graph.add_dataset("testdata/1b");
    let dep1c = graph.add_dataset("testdata/1c");
    let group1 = graph.add_group("testdata/1", vec![dep1a, dep1b, dep1c]);

    fs.touch_all(["testdata/1a", "testdata/1b", "testdata/1c"]);

    let dep2 = graph.add_dataset("testdata/2");
    fs.touch("testdata/2");

    assert!(graph.is_older_than(group1, dep2).unwrap());
    assert!(!graph.is_older_than(dep2, group1).unwrap());
}

#[test]
fn group_exists_only_when_every_member_does() {
    let fs = MockFileSystem::new();
    let mut graph = DepGraph::with_fs(Arc::new(fs.clone()));

    let data = graph.add_dataset("out/data.bin");
    let sidecar = graph.add_dataset("out/data.meta");
    let group = graph.add_group("out/data", vec![data, sidecar]);

    assert!(!graph.exists(group));

    fs.touch("out/data.bin");
    assert!(!graph.exists(group));

    fs.touch("out/data.meta");
    assert!(graph.exists(group));
}
