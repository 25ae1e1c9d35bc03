// tests/integration_graph.rs - Graph assembly and serialization over resolved permissions
mod common;

use common::{ci_cluster, cluster_roles, MemorySource};
use rback_core::config::RenderOptions;
use rback_core::error::RbackError;
use rback_core::filter::{FilterSpec, NameFilter, NamespaceFilter};
use rback_core::graph::{self, dot, json, ContainerId, Graph, NodeKind};
use rback_core::resolve::resolve;
use rback_core::source::RecordKind;
use rback_core::types::ResourceKind;

const BARE: RenderOptions = RenderOptions {
    show_legend: false,
    render_rules: false,
};

fn build(source: &MemorySource, filter: &FilterSpec, options: &RenderOptions) -> Graph {
    let permissions = resolve(source, filter, false).unwrap();
    graph::assemble(&permissions, filter, options).unwrap()
}

fn ids(graph: &Graph) -> Vec<&str> {
    graph.nodes.iter().map(|n| n.id.as_str()).collect()
}

fn focus(kind: ResourceKind, namespaces: &str, names: &[&str]) -> FilterSpec {
    FilterSpec {
        target: Some(kind),
        namespaces: NamespaceFilter::parse(namespaces),
        names: NameFilter::from_names(names.iter().copied()),
        ..FilterSpec::default()
    }
}

#[test]
fn test_binding_links_subject_to_role() {
    let graph = build(&ci_cluster(), &FilterSpec::default(), &BARE);

    let mut nodes = ids(&graph);
    nodes.sort_unstable();
    assert_eq!(
        nodes,
        vec![
            "ServiceAccount-ci/build-bot",
            "ServiceAccount-ci/default",
            "r-ci/deploy-role",
            "rb-ci/deployers",
        ]
    );
    assert!(graph.has_edge("ServiceAccount-ci/build-bot", "rb-ci/deployers"));
    assert!(graph.has_edge("rb-ci/deployers", "r-ci/deploy-role"));
    assert_eq!(graph.edges.len(), 2);
    assert_eq!(graph.edges_of("ServiceAccount-ci/default").count(), 0);
}

#[test]
fn test_namespaced_nodes_live_in_their_namespace() {
    let graph = build(&ci_cluster(), &FilterSpec::default(), &BARE);
    for node in &graph.nodes {
        let container = graph.container(node.container);
        assert_eq!(container.name, "cluster_ci", "{} misplaced", node.id);
        assert_eq!(container.label, "ci");
        assert!(container.dashed);
    }
}

#[test]
fn test_excluded_cluster_role_hides_its_binding() {
    let graph = build(&cluster_roles(), &FilterSpec::default(), &BARE);
    let nodes = ids(&graph);
    assert!(!nodes.contains(&"cr-/system:admin"));
    assert!(!nodes.contains(&"crb-admins"));
    assert!(!nodes.contains(&"Group-/ops"));
    assert!(nodes.contains(&"crb-viewers"));
}

#[test]
fn test_cluster_role_focus_highlights_target() {
    let filter = focus(ResourceKind::ClusterRole, "", &["view"]);
    let graph = build(&cluster_roles(), &filter, &BARE);

    let nodes = ids(&graph);
    assert!(nodes.contains(&"crb-viewers"));
    assert!(nodes.contains(&"User-/alice"));
    assert!(!nodes.contains(&"cr-dev/edit"));
    assert!(!nodes.contains(&"rb-dev/editors"));
    assert!(!nodes.contains(&"User-/bob"));

    let view = graph.node("cr-/view").unwrap();
    assert!(view.highlight);
    assert_eq!(view.container, ContainerId::ROOT);
    assert!(!graph.node("crb-viewers").unwrap().highlight);
}

#[test]
fn test_cluster_role_focus_ignores_namespaces_for_cluster_roles() {
    let source = MemorySource::new()
        .with(
            RecordKind::ClusterRoleBindings,
            r#"{"kind":"List","items":[
                {"metadata":{"name":"viewers"},"roleRef":{"name":"view"},
                 "subjects":[{"kind":"User","name":"alice"}]}
            ]}"#,
        )
        .with(
            RecordKind::RoleBindings,
            r#"{"kind":"List","items":[
                {"metadata":{"name":"local-view","namespace":"prod"},"roleRef":{"name":"view","namespace":"prod"},
                 "subjects":[{"kind":"User","name":"carol"}]},
                {"metadata":{"name":"dev-view","namespace":"dev"},"roleRef":{"name":"view","namespace":"dev"},
                 "subjects":[{"kind":"User","name":"dave"}]}
            ]}"#,
        );
    let filter = focus(ResourceKind::ClusterRole, "dev", &["view"]);
    let graph = build(&source, &filter, &BARE);

    let nodes = ids(&graph);
    assert!(nodes.contains(&"crb-viewers"), "cluster role passes any namespace filter");
    assert!(nodes.contains(&"rb-dev/dev-view"), "namespaced role inside the filter");
    assert!(!nodes.contains(&"rb-prod/local-view"));
}

#[test]
fn test_role_binding_to_cluster_role_is_placed_locally() {
    let graph = build(&cluster_roles(), &FilterSpec::default(), &BARE);
    let edit = graph.node("cr-dev/edit").unwrap();
    assert_eq!(edit.kind, NodeKind::ClusterRole { bound_locally: true });
    assert_eq!(graph.container(edit.container).name, "cluster_dev");

    let view = graph.node("cr-/view").unwrap();
    assert_eq!(view.kind, NodeKind::ClusterRole { bound_locally: false });
    assert_eq!(graph.node("crb-viewers").unwrap().kind, NodeKind::ClusterRoleBinding);
    assert_eq!(graph.node("rb-dev/editors").unwrap().kind, NodeKind::RoleBinding);
}

#[test]
fn test_shared_subject_is_one_node() {
    let source = ci_cluster().with(
        RecordKind::RoleBindings,
        r#"{"kind":"List","items":[
            {"metadata":{"name":"a","namespace":"ci"},"roleRef":{"name":"deploy-role","namespace":"ci"},
             "subjects":[{"kind":"ServiceAccount","name":"build-bot","namespace":"ci"}]},
            {"metadata":{"name":"b","namespace":"ci"},"roleRef":{"name":"deploy-role","namespace":"ci"},
             "subjects":[{"kind":"ServiceAccount","name":"build-bot","namespace":"ci"}]},
            {"metadata":{"name":"c","namespace":"ci"},"roleRef":{"name":"deploy-role","namespace":"ci"},
             "subjects":[{"kind":"ServiceAccount","name":"build-bot","namespace":"ci"},
                         {"kind":"ServiceAccount","name":"build-bot","namespace":"ci"}]}
        ]}"#,
    );
    let graph = build(&source, &FilterSpec::default(), &BARE);

    let count = |id: &str| graph.nodes.iter().filter(|n| n.id == id).count();
    assert_eq!(count("ServiceAccount-ci/build-bot"), 1);
    assert_eq!(count("r-ci/deploy-role"), 1);
    let from_bot = graph
        .edges
        .iter()
        .filter(|e| e.from == "ServiceAccount-ci/build-bot")
        .count();
    assert_eq!(from_bot, 3);
}

#[test]
fn test_service_account_focus() {
    let filter = focus(ResourceKind::ServiceAccount, "ci", &["build-bot"]);
    let graph = build(&ci_cluster(), &filter, &BARE);

    let nodes = ids(&graph);
    assert!(nodes.contains(&"rb-ci/deployers"));
    assert!(!nodes.contains(&"ServiceAccount-ci/default"));
    assert!(graph.node("ServiceAccount-ci/build-bot").unwrap().highlight);
    assert!(!graph.node("r-ci/deploy-role").unwrap().highlight);
}

#[test]
fn test_role_focus_skips_standalone_subjects() {
    let filter = focus(ResourceKind::Role, "ci", &["deploy-role"]);
    let graph = build(&ci_cluster(), &filter, &BARE);
    assert!(graph.node("ServiceAccount-ci/default").is_none());
    assert!(graph.node("r-ci/deploy-role").unwrap().highlight);
}

#[test]
fn test_binding_without_subject_list_is_dropped() {
    let source = MemorySource::new().with(
        RecordKind::RoleBindings,
        r#"{"kind":"List","items":[
            {"metadata":{"name":"absent","namespace":"ci"},"roleRef":{"name":"r","namespace":"ci"}},
            {"metadata":{"name":"null","namespace":"ci"},"roleRef":{"name":"r","namespace":"ci"},"subjects":null},
            {"metadata":{"name":"empty","namespace":"ci"},"roleRef":{"name":"r","namespace":"ci"},"subjects":[]}
        ]}"#,
    );
    let graph = build(&source, &FilterSpec::default(), &BARE);
    let nodes = ids(&graph);
    assert!(!nodes.contains(&"rb-ci/absent"));
    assert!(!nodes.contains(&"rb-ci/null"));
    assert!(nodes.contains(&"rb-ci/empty"));
}

#[test]
fn test_nameless_role_ref_fails_assembly() {
    let source = MemorySource::new().with(
        RecordKind::ClusterRoleBindings,
        r#"{"kind":"List","items":[
            {"metadata":{"name":"broken"},"roleRef":{"name":""},"subjects":[{"kind":"User","name":"x"}]}
        ]}"#,
    );
    let filter = FilterSpec::default();
    let permissions = resolve(&source, &filter, false).unwrap();
    let err = graph::assemble(&permissions, &filter, &BARE).unwrap_err();
    assert!(matches!(err, RbackError::Assembly(_)));
}

#[test]
fn test_rules_node_summarizes_role() {
    let options = RenderOptions {
        show_legend: false,
        render_rules: true,
    };
    let graph = build(&ci_cluster(), &FilterSpec::default(), &options);
    let rules = graph.node("rules-r-ci/deploy-role").unwrap();
    assert_eq!(rules.kind, NodeKind::Rules);
    assert_eq!(rules.label, "create,update deployments (apps)\n");
    assert!(graph.has_edge("r-ci/deploy-role", "rules-r-ci/deploy-role"));

    let graph = build(&cluster_roles(), &FilterSpec::default(), &options);
    let local = graph.node("rules-cr-dev/edit").unwrap();
    assert_eq!(local.label, "* pods\n");
}

#[test]
fn test_legend_is_rendered_first() {
    let graph = build(&ci_cluster(), &FilterSpec::default(), &RenderOptions::default());
    assert!(graph.nodes[0].id.starts_with("legend/"));
    let legend = graph.nodes.iter().filter(|n| n.id.starts_with("legend/")).count();
    assert_eq!(legend, 10);
    assert!(graph.node("ServiceAccount-ci/build-bot").is_some());
}

#[test]
fn test_dot_output() {
    let graph = build(&ci_cluster(), &FilterSpec::default(), &RenderOptions::default());
    let out = dot::write(&graph);
    assert!(out.starts_with("digraph  {\n"));
    assert!(out.contains("\tnewrank=\"true\";\n"));
    assert!(out.contains("subgraph \"cluster_legend/\" {"));
    assert!(out.contains("subgraph \"cluster_ci\" {"));
    assert!(out.contains(r#""ServiceAccount-ci/build-bot"->"rb-ci/deployers" [ dir="back" ];"#));
    assert!(out.contains(r#""rb-ci/deployers"->"r-ci/deploy-role";"#));
    assert!(out.contains(r#"label="create,update deployments (apps)\l""#));
    assert!(out.ends_with("}\n"));
}

#[test]
fn test_output_is_deterministic() {
    let first = dot::write(&build(&cluster_roles(), &FilterSpec::default(), &RenderOptions::default()));
    let second = dot::write(&build(&cluster_roles(), &FilterSpec::default(), &RenderOptions::default()));
    assert_eq!(first, second);

    let permissions = resolve(&cluster_roles(), &FilterSpec::default(), true).unwrap();
    let parallel = graph::assemble(&permissions, &FilterSpec::default(), &RenderOptions::default()).unwrap();
    assert_eq!(first, dot::write(&parallel));
}

#[test]
fn test_json_output_lists_nodes_and_edges() {
    let graph = build(&ci_cluster(), &FilterSpec::default(), &BARE);
    let out = json::write(&graph).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let nodes = value["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 4);
    assert!(nodes.iter().any(|n| n["id"] == "rb-ci/deployers" && n["kind"] == "role_binding"));
    assert_eq!(value["edges"].as_array().unwrap().len(), 2);
}

#[test]
fn test_excluded_subject_is_never_an_endpoint() {
    let source = ci_cluster().with(
        RecordKind::RoleBindings,
        r#"{"kind":"List","items":[
            {"metadata":{"name":"deployers","namespace":"ci"},"roleRef":{"name":"deploy-role","namespace":"ci"},
             "subjects":[{"kind":"User","name":"system:kube-proxy"},
                         {"kind":"ServiceAccount","name":"build-bot","namespace":"ci"}]},
            {"metadata":{"name":"more","namespace":"ci"},"roleRef":{"name":"deploy-role","namespace":"ci"},
             "subjects":[{"kind":"User","name":"system:kube-proxy"}]}
        ]}"#,
    );
    let graph = build(&source, &FilterSpec::default(), &BARE);
    assert!(graph.node("User-/system:kube-proxy").is_none());
    assert_eq!(graph.edges_of("User-/system:kube-proxy").count(), 0);
    assert!(graph.has_edge("ServiceAccount-ci/build-bot", "rb-ci/deployers"));
    assert!(graph.node("rb-ci/more").is_some());
}

#[test]
fn test_namespace_filter_leaves_cluster_nodes_unfocused() {
    let filter = focus(ResourceKind::ClusterRole, "dev", &["view"]);
    let graph = build(&cluster_roles(), &filter, &BARE);
    let view = graph.node("cr-/view").unwrap();
    assert!(!view.highlight);

    let filter = focus(ResourceKind::ClusterRoleBinding, "dev", &["viewers"]);
    let graph = build(&cluster_roles(), &filter, &BARE);
    let viewers = graph.node("crb-viewers").unwrap();
    assert!(!viewers.highlight);
    assert!(graph.node("cr-/view").is_some());
}
