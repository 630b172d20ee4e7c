// src/graph/arena.rs

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::errors::{FiledagError, Result};
use crate::fs::{FileStat, RealFileSystem};

/// Opaque handle to a node owned by a [`DepGraph`].
///
/// Ids are only meaningful for the graph that created them; indexing another
/// graph with them panics, like any out-of-bounds index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

#[derive(Debug, Clone)]
enum NodeKind {
    /// A single file-backed artifact. The name *is* the path.
    Dataset { path: PathBuf },
    /// Several datasets that are always built together and judged
    /// stale/fresh as a unit (e.g. a file plus its sidecar metadata).
    Group { members: Vec<NodeId> },
}

#[derive(Debug, Clone)]
struct NodeData {
    name: String,
    kind: NodeKind,
    /// Direct dependencies declared on this node.
    parents: Vec<NodeId>,
    /// Direct dependents declared on this node.
    children: Vec<NodeId>,
    meta: HashMap<String, String>,
}

/// Arena holding every dataset and group, plus the filesystem view used for
/// existence and age queries.
///
/// The graph is append-only: nodes and edges can be added but never removed.
/// Planners and the orchestrator only ever read it; the filesystem is the
/// only thing that changes during a build.
#[derive(Debug, Clone)]
pub struct DepGraph {
    nodes: Vec<NodeData>,
    fs: Arc<dyn FileStat>,
}

impl Default for DepGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DepGraph {
    /// Graph backed by the real filesystem.
    pub fn new() -> Self {
        Self::with_fs(Arc::new(RealFileSystem))
    }

    /// Graph backed by an explicit [`FileStat`] implementation (tests use
    /// the in-memory mock here).
    pub fn with_fs(fs: Arc<dyn FileStat>) -> Self {
        Self { nodes: Vec::new(), fs }
    }

    /// Add a dataset node. The name is conventionally a filesystem path.
    pub fn add_dataset(&mut self, name: impl Into<String>) -> NodeId {
        let name = name.into();
        let path = PathBuf::from(&name);
        self.push_node(NodeData {
            name,
            kind: NodeKind::Dataset { path },
            parents: Vec::new(),
            children: Vec::new(),
            meta: HashMap::new(),
        })
    }

    /// Add a group node over existing members.
    ///
    /// Members remain independently addressable; the group does not own
    /// their lifecycle.
    pub fn add_group(&mut self, name: impl Into<String>, members: Vec<NodeId>) -> NodeId {
        debug_assert!(!members.is_empty(), "a DatasetGroup needs at least one member");
        self.push_node(NodeData {
            name: name.into(),
            kind: NodeKind::Group { members },
            parents: Vec::new(),
            children: Vec::new(),
            meta: HashMap::new(),
        })
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(data);
        id
    }

    /// Declare that `child` depends on each of `parents`.
    ///
    /// Edges are inserted symmetrically (into the child's parent list and
    /// the parent's child list) in the same operation. Re-declaring an
    /// existing edge is a no-op. There is no edge-removal primitive.
    pub fn depends_on(&mut self, child: NodeId, parents: impl IntoIterator<Item = NodeId>) {
        for parent in parents {
            if self.nodes[child.0 as usize].parents.contains(&parent) {
                continue;
            }
            self.nodes[child.0 as usize].parents.push(parent);
            self.nodes[parent.0 as usize].children.push(child);
        }
    }

    /// Node name (for datasets, the path it was declared with).
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0 as usize].name
    }

    /// Whether `id` refers to a group node.
    pub fn is_group(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0 as usize].kind, NodeKind::Group { .. })
    }

    /// Group members, empty for plain datasets.
    pub fn members(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0 as usize].kind {
            NodeKind::Dataset { .. } => &[],
            NodeKind::Group { members } => members,
        }
    }

    /// The file paths this node names on disk: one for a dataset, every
    /// member's paths for a group. This is what a delegator must produce.
    pub fn paths(&self, id: NodeId) -> Vec<&Path> {
        match &self.nodes[id.0 as usize].kind {
            NodeKind::Dataset { path } => vec![path.as_path()],
            NodeKind::Group { members } => {
                members.iter().flat_map(|m| self.paths(*m)).collect()
            }
        }
    }

    /// Attach a metadata key/value to a node.
    pub fn set_meta(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.nodes[id.0 as usize].meta.insert(key.into(), value.into());
    }

    /// Look up a metadata key, failing with [`FiledagError::UnknownAttribute`]
    /// if it was never declared.
    pub fn meta(&self, id: NodeId, key: &str) -> Result<&str> {
        let data = &self.nodes[id.0 as usize];
        data.meta
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| FiledagError::UnknownAttribute {
                node: data.name.clone(),
                key: key.to_string(),
            })
    }

    /// Direct parents of a node. For a group this is the union of the
    /// members' parent sets (plus edges declared on the group itself),
    /// deduplicated in declaration order.
    pub(crate) fn direct_parents(&self, id: NodeId) -> Vec<NodeId> {
        self.direct_edges(id, |data| &data.parents)
    }

    /// Direct children, symmetric to [`Self::direct_parents`].
    pub(crate) fn direct_children(&self, id: NodeId) -> Vec<NodeId> {
        self.direct_edges(id, |data| &data.children)
    }

    fn direct_edges(&self, id: NodeId, pick: impl Fn(&NodeData) -> &Vec<NodeId>) -> Vec<NodeId> {
        let data = &self.nodes[id.0 as usize];
        let mut out: Vec<NodeId> = Vec::new();
        let mut push = |edge: NodeId| {
            if !out.contains(&edge) {
                out.push(edge);
            }
        };
        for edge in pick(data) {
            push(*edge);
        }
        if let NodeKind::Group { members } = &data.kind {
            for member in members {
                for edge in pick(&self.nodes[member.0 as usize]) {
                    push(*edge);
                }
            }
        }
        out
    }

    /// Whether the node's file(s) are present: a dataset exists when its
    /// file does, a group when *every* member exists.
    pub fn exists(&self, id: NodeId) -> bool {
        match &self.nodes[id.0 as usize].kind {
            NodeKind::Dataset { path } => self.fs.is_file(path),
            NodeKind::Group { members } => members.iter().all(|m| self.exists(*m)),
        }
    }

    /// Earliest mtime across the node's files.
    pub fn min_age(&self, id: NodeId) -> Result<SystemTime> {
        self.fold_age(id, |acc, t| if t < acc { t } else { acc })
    }

    /// Latest mtime across the node's files.
    pub fn max_age(&self, id: NodeId) -> Result<SystemTime> {
        self.fold_age(id, |acc, t| if t > acc { t } else { acc })
    }

    fn fold_age(
        &self,
        id: NodeId,
        pick: impl Fn(SystemTime, SystemTime) -> SystemTime + Copy,
    ) -> Result<SystemTime> {
        match &self.nodes[id.0 as usize].kind {
            NodeKind::Dataset { path } => Ok(self.fs.mtime(path)?),
            NodeKind::Group { members } => {
                let mut acc: Option<SystemTime> = None;
                for member in members {
                    let age = self.fold_age(*member, pick)?;
                    acc = Some(match acc {
                        Some(prev) => pick(prev, age),
                        None => age,
                    });
                }
                acc.ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidInput, "group has no members").into()
                })
            }
        }
    }

    /// Whether `a` was last modified before `b`.
    ///
    /// Deliberately conservative for groups: compares `a`'s *latest* member
    /// against `b`'s *earliest*, so a group is judged older only when every
    /// member of `a` predates every member of `b`. Overlapping age ranges
    /// compare as not-older.
    pub fn is_older_than(&self, a: NodeId, b: NodeId) -> Result<bool> {
        Ok(self.max_age(a)? < self.min_age(b)?)
    }
}
