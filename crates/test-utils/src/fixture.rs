#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use filedag::fs::FileStat;
use filedag::{DepGraph, NodeId};

/// The dependency graph used across the planner and orchestrator tests;
/// complex enough to be interesting:
///
/// ```text
///  raw0    raw1    raw2    raw3        [raw data]
///    \     /        |       |
///      da0         da1     /
///          \      /   \   /
///             db0      db1
///              \      / |  \
///               \    /  |   \
///                dc0   dc1  dc2        [products]
/// ```
pub struct FixtureGraph {
    pub graph: DepGraph,
    pub raw0: NodeId,
    pub raw1: NodeId,
    pub raw2: NodeId,
    pub raw3: NodeId,
    pub da0: NodeId,
    pub da1: NodeId,
    pub db0: NodeId,
    pub db1: NodeId,
    pub dc0: NodeId,
    pub dc1: NodeId,
    pub dc2: NodeId,
}

impl FixtureGraph {
    /// Build the fixture against the real filesystem, with node paths
    /// rooted at `root` (typically a temp directory).
    pub fn new(root: &Path) -> Self {
        Self::build(DepGraph::new(), root)
    }

    /// Build the fixture against an explicit filesystem view.
    pub fn with_fs(root: &Path, fs: Arc<dyn FileStat>) -> Self {
        Self::build(DepGraph::with_fs(fs), root)
    }

    fn build(mut graph: DepGraph, root: &Path) -> Self {
        let path = |name: &str| root.join(name).to_string_lossy().into_owned();

        let raw0 = graph.add_dataset(path("testdata/raw0"));
        let raw1 = graph.add_dataset(path("testdata/raw1"));
        let raw2 = graph.add_dataset(path("testdata/raw2"));
        let raw3 = graph.add_dataset(path("testdata/raw3"));

        let da0 = graph.add_dataset(path("testproject/da0"));
        let da1 = graph.add_dataset(path("testproject/da1"));
        let db0 = graph.add_dataset(path("testproject/db0"));
        let db1 = graph.add_dataset(path("testproject/db1"));
        let dc0 = graph.add_dataset(path("testproject/dc0"));
        let dc1 = graph.add_dataset(path("testproject/dc1"));
        let dc2 = graph.add_dataset(path("testproject/dc2"));

        graph.depends_on(da0, [raw0, raw1]);
        graph.depends_on(da1, [raw2]);
        graph.depends_on(db0, [da0, da1]);
        graph.depends_on(db1, [da1, raw3]);
        graph.depends_on(dc0, [db0, db1]);
        graph.depends_on(dc1, [db1]);
        graph.depends_on(dc2, [db1]);

        Self {
            graph,
            raw0,
            raw1,
            raw2,
            raw3,
            da0,
            da1,
            db0,
            db1,
            dc0,
            dc1,
            dc2,
        }
    }

    /// Node names of the given ids, for readable assertions.
    pub fn names(&self, ids: &[NodeId]) -> Vec<String> {
        ids.iter().map(|id| self.graph.name(*id).to_string()).collect()
    }
}

/// Create a small real file at `path`, creating parent directories as
/// needed.
pub fn makefile(path: impl AsRef<Path>) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("creating fixture dir");
    }
    fs::write(path, path.to_string_lossy().as_bytes()).expect("writing fixture file");
}
