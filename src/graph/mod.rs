// src/graph/mod.rs
//! The abstract permission graph and its serializers.
//!
//! A [`Graph`] only records which nodes, edges and containers exist. How they
//! look is decided by the serializers in [`dot`] and [`json`].

pub mod assembler;
pub mod dot;
pub mod index;
pub mod json;
pub mod legend;

pub use assembler::assemble;

use serde::Serialize;
use std::collections::HashSet;

/// Handle of a container inside one [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ContainerId(usize);

impl ContainerId {
    /// The top level of the graph, which is also the cluster scope.
    pub const ROOT: Self = Self(0);
}

/// A grouping boundary: a namespace, the legend, or the top level.
#[derive(Debug, Clone, Serialize)]
pub struct Container {
    pub id: ContainerId,
    pub parent: Option<ContainerId>,
    pub name: String,
    pub label: String,
    pub dashed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Subject,
    Role,
    /// `bound_locally` marks a cluster role placed in a namespace by a role binding.
    ClusterRole { bound_locally: bool },
    RoleBinding,
    ClusterRoleBinding,
    Rules,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub highlight: bool,
    pub container: ContainerId,
}

/// A directed edge. `back` asks the renderer to draw the arrowhead at `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub back: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Graph {
    pub attributes: Vec<(String, String)>,
    pub containers: Vec<Container>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(skip)]
    edge_keys: HashSet<(String, String)>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self {
            // Rank globally so rule summaries line up at the bottom.
            attributes: vec![("newrank".to_string(), "true".to_string())],
            containers: vec![Container {
                id: ContainerId::ROOT,
                parent: None,
                name: String::new(),
                label: String::new(),
                dashed: false,
            }],
            nodes: Vec::new(),
            edges: Vec::new(),
            edge_keys: HashSet::new(),
        }
    }

    pub fn add_container(
        &mut self,
        parent: ContainerId,
        name: &str,
        label: &str,
        dashed: bool,
    ) -> ContainerId {
        let id = ContainerId(self.containers.len());
        self.containers.push(Container {
            id,
            parent: Some(parent),
            name: name.to_string(),
            label: label.to_string(),
            dashed,
        });
        id
    }

    /// Appends a node. Callers that need deduplication go through [`index::NodeIndex`].
    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Adds an edge unless the same `from -> to` pair already exists.
    pub fn add_edge(&mut self, from: &str, to: &str, back: bool) {
        if self.edge_keys.insert((from.to_string(), to.to_string())) {
            self.edges.push(Edge {
                from: from.to_string(),
                to: to.to_string(),
                back,
            });
        }
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edge_keys.contains(&(from.to_string(), to.to_string()))
    }

    #[must_use]
    pub fn container(&self, id: ContainerId) -> &Container {
        &self.containers[id.0]
    }

    pub fn children(&self, parent: ContainerId) -> impl Iterator<Item = &Container> {
        self.containers
            .iter()
            .filter(move |c| c.parent == Some(parent))
    }

    pub fn nodes_in(&self, container: ContainerId) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.container == container)
    }

    /// Edges touching `id` at either end.
    pub fn edges_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| e.from == id || e.to == id)
    }
}
