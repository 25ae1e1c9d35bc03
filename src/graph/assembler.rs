//! Builds the permission graph from a resolved snapshot.
//!
//! One pass runs the legend, then the standalone service accounts, then every
//! binding. All iteration goes over ordered maps, so identical input yields an
//! identical graph.

use tracing::{debug, info};

use super::index::{NodeDraft, NodeIndex, NodeKey};
use super::{legend, ContainerId, Graph, NodeKind};
use crate::config::RenderOptions;
use crate::error::Result;
use crate::filter::{FilterSpec, NamespaceFilter};
use crate::resolve::{bindings, Permissions};
use crate::rules::lookup_rules;
use crate::types::{Binding, Identity, ResourceKind};

/// Assembles the graph for one run.
///
/// # Errors
/// Returns an assembly error if a binding record cannot be resolved.
pub fn assemble(
    permissions: &Permissions,
    filter: &FilterSpec,
    options: &RenderOptions,
) -> Result<Graph> {
    let mut assembler = Assembler {
        permissions,
        filter,
        options,
        graph: Graph::new(),
        index: NodeIndex::default(),
    };

    if options.show_legend {
        legend::render(&mut assembler.graph, options.render_rules);
    }
    if filter.renders_all_subjects() {
        assembler.render_subjects();
    }
    let rendered = assembler.render_bindings()?;

    info!(
        bindings = rendered,
        nodes = assembler.graph.nodes.len(),
        edges = assembler.graph.edges.len(),
        "graph assembled"
    );
    Ok(assembler.graph)
}

struct Assembler<'a> {
    permissions: &'a Permissions,
    filter: &'a FilterSpec,
    options: &'a RenderOptions,
    graph: Graph,
    index: NodeIndex,
}

impl Assembler<'_> {
    fn namespaces_to_show(&self) -> Vec<String> {
        match &self.filter.namespaces {
            NamespaceFilter::All => self.permissions.namespaces().into_iter().collect(),
            NamespaceFilter::Only(set) => set.iter().cloned().collect(),
        }
    }

    fn render_subjects(&mut self) {
        let permissions = self.permissions;
        for ns in self.namespaces_to_show() {
            let Some(accounts) = permissions.service_accounts.get(&ns) else {
                continue;
            };
            for identity in accounts.values() {
                if !self.filter.is_excluded(&identity.name) {
                    self.subject_node(identity);
                }
            }
        }
    }

    fn render_bindings(&mut self) -> Result<usize> {
        let permissions = self.permissions;
        let mut rendered = 0;
        for (scope, records) in &permissions.bindings {
            for binding in bindings::index(scope, records, &self.filter.exclusions)? {
                if !self.filter.includes_binding(&binding) {
                    continue;
                }
                self.render_binding(&binding);
                rendered += 1;
            }
        }
        Ok(rendered)
    }

    fn render_binding(&mut self, binding: &Binding) {
        debug!(scope = %binding.scope, binding = %binding.name, role = %binding.role.name, "rendering binding");
        let container = self.index.container(&mut self.graph, &binding.scope);
        let binding_id = self.binding_node(container, binding);
        let role_id = self.role_node(container, binding);
        self.graph.add_edge(&binding_id, &role_id, false);

        if self.options.render_rules {
            self.rules_node(container, binding, &role_id);
        }

        for subject in &binding.subjects {
            if self.filter.is_excluded(&subject.name) || !self.filter.includes_subject(subject) {
                continue;
            }
            let subject_id = self.subject_node(subject);
            self.graph.add_edge(&subject_id, &binding_id, true);
        }
    }

    fn subject_node(&mut self, identity: &Identity) -> String {
        let container = self.index.container(&mut self.graph, &identity.scope);
        let highlight = identity
            .kind
            .resource_kind()
            .is_some_and(|kind| self.filter.is_focused(kind, &identity.scope, &identity.name));
        let label = format!("{}\n({})", identity.name, identity.kind);
        self.index.node(
            &mut self.graph,
            container,
            NodeKey::Subject(identity.clone()),
            || NodeDraft {
                kind: NodeKind::Subject,
                label,
                highlight,
            },
        )
    }

    fn binding_node(&mut self, container: ContainerId, binding: &Binding) -> String {
        let (kind, focus) = if binding.is_cluster_binding() {
            (NodeKind::ClusterRoleBinding, ResourceKind::ClusterRoleBinding)
        } else {
            (NodeKind::RoleBinding, ResourceKind::RoleBinding)
        };
        let highlight = self.filter.is_focused(focus, &binding.scope, &binding.name);
        let key = NodeKey::Binding {
            scope: binding.scope.clone(),
            name: binding.name.clone(),
        };
        self.index.node(&mut self.graph, container, key, || NodeDraft {
            kind,
            label: binding.name.clone(),
            highlight,
        })
    }

    fn role_node(&mut self, container: ContainerId, binding: &Binding) -> String {
        let role = &binding.role;
        let (kind, focus) = if role.is_cluster_role() {
            let bound_locally = !binding.scope.is_cluster();
            (NodeKind::ClusterRole { bound_locally }, ResourceKind::ClusterRole)
        } else {
            (NodeKind::Role, ResourceKind::Role)
        };
        let highlight = self.filter.is_focused(focus, &role.scope, &role.name);
        let key = NodeKey::Role {
            placement: binding.scope.clone(),
            role: role.clone(),
        };
        self.index.node(&mut self.graph, container, key, || NodeDraft {
            kind,
            label: role.name.clone(),
            highlight,
        })
    }

    fn rules_node(&mut self, container: ContainerId, binding: &Binding, role_id: &str) {
        let rules = lookup_rules(self.permissions, &binding.scope, &binding.role.name);
        if rules.is_empty() {
            return;
        }
        let key = NodeKey::Rules {
            placement: binding.scope.clone(),
            role: binding.role.clone(),
        };
        let rules_id = self.index.node(&mut self.graph, container, key, || NodeDraft {
            kind: NodeKind::Rules,
            label: rules,
            highlight: false,
        });
        self.graph.add_edge(role_id, &rules_id, false);
    }
}

