//! Graphviz DOT serialization.

use std::fmt::Write;

use super::{Container, ContainerId, Graph, Node, NodeKind};

const SUBJECT_FILL: &str = "#2f6de1";
const SUBJECT_FONT: &str = "#f0f0f0";
const BINDING_FILL: &str = "#ffcc00";
const ROLE_FILL: &str = "#ff9900";
const DARK_FONT: &str = "#030303";

/// Writes `graph` as a directed DOT graph.
#[must_use]
pub fn write(graph: &Graph) -> String {
    let mut out = String::new();
    out.push_str("digraph  {\n");
    for (key, value) in &graph.attributes {
        let _ = writeln!(out, "\t{key}={};", quote(value));
    }
    write_container(&mut out, graph, ContainerId::ROOT, 1);
    for edge in &graph.edges {
        let attrs = if edge.back { " [ dir=\"back\" ]" } else { "" };
        let _ = writeln!(out, "\t{}->{}{attrs};", quote(&edge.from), quote(&edge.to));
    }
    out.push_str("}\n");
    out
}

fn write_container(out: &mut String, graph: &Graph, id: ContainerId, depth: usize) {
    let indent = "\t".repeat(depth);
    for child in graph.children(id) {
        write_subgraph(out, graph, child, depth);
    }
    for node in graph.nodes_in(id) {
        let attrs = node_attributes(node)
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(out, "{indent}{} [ {attrs} ];", quote(&node.id));
    }
}

fn write_subgraph(out: &mut String, graph: &Graph, container: &Container, depth: usize) {
    let indent = "\t".repeat(depth);
    let _ = writeln!(out, "{indent}subgraph {} {{", quote(&container.name));
    let _ = writeln!(out, "{indent}\tlabel={};", quote(&container.label));
    if container.dashed {
        let _ = writeln!(out, "{indent}\tstyle=\"dashed\";");
    }
    write_container(out, graph, container.id, depth + 1);
    let _ = writeln!(out, "{indent}}}");
}

fn node_attributes(node: &Node) -> Vec<(&'static str, String)> {
    let penwidth = if node.highlight { "2.0" } else { "1.0" };
    let (shape, style, fill, font) = match node.kind {
        NodeKind::Rules => {
            return vec![
                ("label", format!("\"{}\"", escape_left_justified(&node.label))),
                ("shape", quote("note")),
            ];
        }
        NodeKind::Subject => ("box", "filled", SUBJECT_FILL, SUBJECT_FONT),
        NodeKind::RoleBinding => ("octagon", "filled", BINDING_FILL, DARK_FONT),
        NodeKind::ClusterRoleBinding => ("doubleoctagon", "filled", BINDING_FILL, DARK_FONT),
        NodeKind::Role => ("octagon", "filled", ROLE_FILL, DARK_FONT),
        NodeKind::ClusterRole { bound_locally } => (
            "doubleoctagon",
            if bound_locally { "filled,dashed" } else { "filled" },
            ROLE_FILL,
            DARK_FONT,
        ),
    };
    vec![
        ("fillcolor", quote(fill)),
        ("fontcolor", quote(font)),
        ("label", quote(&node.label)),
        ("penwidth", quote(penwidth)),
        ("shape", quote(shape)),
        ("style", quote(style)),
    ]
}

/// Quotes a DOT string; newlines become centered line breaks.
fn quote(raw: &str) -> String {
    format!("\"{}\"", escape(raw, "\\n"))
}

/// Escapes a label whose lines should be left-justified.
fn escape_left_justified(raw: &str) -> String {
    escape(raw, "\\l")
}

fn escape(raw: &str, line_break: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str(line_break),
            c => out.push(c),
        }
    }
    out
}
