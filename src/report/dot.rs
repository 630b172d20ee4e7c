// src/report/dot.rs

use crate::graph::{DepGraph, NodeId};
use crate::report::{ancestor_edges, descendant_edges};

type NodeIdFn<'a> = Box<dyn Fn(&DepGraph, NodeId) -> String + 'a>;
type StyleFn<'a> = Box<dyn Fn(&DepGraph, NodeId, NodeId) -> Vec<(String, String)> + 'a>;
type IncludeFn<'a> = Box<dyn Fn(&DepGraph, NodeId, NodeId) -> bool + 'a>;

/// Renders the dependency neighbourhood of one or more nodes as a graphviz
/// diagram in dot format.
///
/// The rendered graph is the union of the ancestor and descendant edges of
/// every given node. Node naming, edge styling and edge inclusion are
/// pluggable; defaults are the node name, bare styling and all edges.
pub struct DotRenderer<'a> {
    node_id: NodeIdFn<'a>,
    style: StyleFn<'a>,
    include: IncludeFn<'a>,
}

impl Default for DotRenderer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> DotRenderer<'a> {
    pub fn new() -> Self {
        Self {
            node_id: Box::new(|g, n| g.name(n).to_string()),
            style: Box::new(|_, _, _| Vec::new()),
            include: Box::new(|_, _, _| true),
        }
    }

    /// Override how a node is named in the diagram.
    pub fn node_id(mut self, f: impl Fn(&DepGraph, NodeId) -> String + 'a) -> Self {
        self.node_id = Box::new(f);
        self
    }

    /// Override edge styling: return graphviz attributes for the edge
    /// `(parent, child)`.
    pub fn style(
        mut self,
        f: impl Fn(&DepGraph, NodeId, NodeId) -> Vec<(String, String)> + 'a,
    ) -> Self {
        self.style = Box::new(f);
        self
    }

    /// Restrict which `(parent, child)` edges are rendered.
    pub fn include(mut self, f: impl Fn(&DepGraph, NodeId, NodeId) -> bool + 'a) -> Self {
        self.include = Box::new(f);
        self
    }

    pub fn render(&self, graph: &DepGraph, datasets: &[NodeId]) -> String {
        let mut edges: Vec<(NodeId, NodeId)> = Vec::new();
        for ds in datasets {
            for edge in descendant_edges(graph, *ds)
                .into_iter()
                .chain(ancestor_edges(graph, *ds))
            {
                if !edges.contains(&edge) {
                    edges.push(edge);
                }
            }
        }

        let mut relations: Vec<String> = Vec::new();
        for (parent, child) in edges {
            if !(self.include)(graph, parent, child) {
                continue;
            }
            let attrs = (self.style)(graph, parent, child);
            let suffix = if attrs.is_empty() {
                String::new()
            } else {
                let pairs: Vec<String> =
                    attrs.iter().map(|(k, v)| format!("{k}={v}")).collect();
                format!(" [{}]", pairs.join(","))
            };
            relations.push(format!(
                "\"{}\" -> \"{}\"{}",
                (self.node_id)(graph, parent),
                (self.node_id)(graph, child),
                suffix
            ));
        }

        format!("strict digraph {{\n  {}\n}}", relations.join("\n  "))
    }
}
