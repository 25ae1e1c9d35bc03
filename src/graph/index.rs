//! Lookup tables that keep one node per entity and one container per namespace.

use std::collections::HashMap;

use super::{ContainerId, Graph, Node, NodeKind};
use crate::types::{Identity, RoleRef, Scope};

/// Composite identity of a rendered entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Subject(Identity),
    Binding { scope: Scope, name: String },
    /// Roles are placed next to the binding that grants them.
    Role { placement: Scope, role: RoleRef },
    Rules { placement: Scope, role: RoleRef },
}

impl NodeKey {
    /// Stable node id used by the serializers.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::Subject(identity) => format!(
                "{}-{}/{}",
                identity.kind,
                identity.scope.as_key(),
                identity.name
            ),
            Self::Binding {
                scope: Scope::Cluster,
                name,
            } => format!("crb-{name}"),
            Self::Binding { scope, name } => format!("rb-{}/{name}", scope.as_key()),
            Self::Role { placement, role } => {
                let prefix = if role.is_cluster_role() { "cr" } else { "r" };
                format!("{prefix}-{}/{}", placement.as_key(), role.name)
            }
            Self::Rules { placement, role } => {
                let role_key = Self::Role {
                    placement: placement.clone(),
                    role: role.clone(),
                };
                format!("rules-{}", role_key.id())
            }
        }
    }
}

/// What a node looks like when it is first created.
#[derive(Debug, Clone)]
pub struct NodeDraft {
    pub kind: NodeKind,
    pub label: String,
    pub highlight: bool,
}

/// Owned by one assembly pass.
#[derive(Debug, Default)]
pub struct NodeIndex {
    containers: HashMap<Scope, ContainerId>,
    nodes: HashMap<NodeKey, String>,
}

impl NodeIndex {
    /// The container for `scope`, created on first use. Cluster scope is the root.
    pub fn container(&mut self, graph: &mut Graph, scope: &Scope) -> ContainerId {
        let Scope::Namespace(ns) = scope else {
            return ContainerId::ROOT;
        };
        *self
            .containers
            .entry(scope.clone())
            .or_insert_with(|| graph.add_container(ContainerId::ROOT, &format!("cluster_{ns}"), ns, true))
    }

    /// The node id for `key`, creating the node from `draft` on first use.
    pub fn node<F>(&mut self, graph: &mut Graph, container: ContainerId, key: NodeKey, draft: F) -> String
    where
        F: FnOnce() -> NodeDraft,
    {
        if let Some(id) = self.nodes.get(&key) {
            return id.clone();
        }
        let id = key.id();
        let NodeDraft {
            kind,
            label,
            highlight,
        } = draft();
        graph.add_node(Node {
            id: id.clone(),
            kind,
            label,
            highlight,
            container,
        });
        self.nodes.insert(key, id.clone());
        id
    }
}
