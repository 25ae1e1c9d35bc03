//! The fixed legend explaining node shapes. It never depends on cluster data.

use super::{ContainerId, Graph, Node, NodeKind};

/// Prefix of every legend node id, so legend nodes never merge with real ones.
pub const LEGEND_PREFIX: &str = "legend/";

/// Subgraph name of the legend. Namespace names cannot contain `/`, so no
/// namespace container shares it.
pub const LEGEND_CONTAINER: &str = "cluster_legend/";

/// Adds the legend subgraph. Rule nodes are only drawn when `render_rules` is set.
pub fn render(graph: &mut Graph, render_rules: bool) {
    let legend = graph.add_container(ContainerId::ROOT, LEGEND_CONTAINER, "LEGEND", false);
    let namespace_container = format!("{LEGEND_CONTAINER}namespace");
    let namespace = graph.add_container(legend, &namespace_container, "Namespace", true);

    let subject = add(graph, namespace, "Kind-Subject", NodeKind::Subject, "Subject\n(Kind)");
    let role = add(graph, namespace, "r-ns/Role", NodeKind::Role, "Role");
    let local_cluster_role = add(
        graph,
        namespace,
        "cr-ns/ClusterRole",
        NodeKind::ClusterRole {
            bound_locally: true,
        },
        "ClusterRole",
    );
    let cluster_role = add(
        graph,
        legend,
        "cr-/ClusterRole",
        NodeKind::ClusterRole {
            bound_locally: false,
        },
        "ClusterRole",
    );

    let role_binding = add(graph, namespace, "rb-RoleBinding", NodeKind::RoleBinding, "RoleBinding");
    graph.add_edge(&subject, &role_binding, true);
    graph.add_edge(&role_binding, &role, false);

    let local_binding = add(
        graph,
        namespace,
        "rb-RoleBinding-to-ClusterRole",
        NodeKind::RoleBinding,
        "RoleBinding",
    );
    graph.add_edge(&subject, &local_binding, true);
    graph.add_edge(&local_binding, &local_cluster_role, false);

    let cluster_binding = add(
        graph,
        legend,
        "crb-ClusterRoleBinding",
        NodeKind::ClusterRoleBinding,
        "ClusterRoleBinding",
    );
    graph.add_edge(&subject, &cluster_binding, true);
    graph.add_edge(&cluster_binding, &cluster_role, false);

    if render_rules {
        let ns_rules = "Namespace-scoped\naccess rules";
        let rules = add(graph, namespace, "rules-ns/Role", NodeKind::Rules, ns_rules);
        graph.add_edge(&role, &rules, false);

        let rules = add(graph, namespace, "rules-ns/ClusterRole", NodeKind::Rules, ns_rules);
        graph.add_edge(&local_cluster_role, &rules, false);

        let cluster_rules = "Cluster-scoped\naccess rules";
        let rules = add(graph, legend, "rules-/ClusterRole", NodeKind::Rules, cluster_rules);
        graph.add_edge(&cluster_role, &rules, false);
    }
}

fn add(graph: &mut Graph, container: ContainerId, id: &str, kind: NodeKind, label: &str) -> String {
    let id = format!("{LEGEND_PREFIX}{id}");
    graph.add_node(Node {
        id: id.clone(),
        kind,
        label: label.to_string(),
        highlight: false,
        container,
    });
    id
}
