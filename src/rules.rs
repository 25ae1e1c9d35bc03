// src/rules.rs
//! Human-readable summaries of the access rules a role grants.

use crate::resolve::Permissions;
use crate::types::{AccessRule, Scope};

/// Formats one rule as `verbs resources "names" urls (groups)`.
/// Categories that join to an empty string are omitted, so the core API group `""` never shows.
#[must_use]
pub fn format_rule(rule: &AccessRule) -> String {
    let mut line = rule.verbs.join(",");
    let mut push = |part: String| {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&part);
    };
    let resources = rule.resources.join(",");
    if !resources.is_empty() {
        push(resources);
    }
    let names = rule.resource_names.join(",");
    if !names.is_empty() {
        push(format!("\"{names}\""));
    }
    let urls = rule.non_resource_urls.join(",");
    if !urls.is_empty() {
        push(urls);
    }
    let groups = rule.api_groups.join(",");
    if !groups.is_empty() {
        push(format!("({groups})"));
    }
    line
}

/// One newline-terminated line per rule, in the order given.
#[must_use]
pub fn format_rules(rules: &[AccessRule]) -> String {
    rules.iter().map(|r| format_rule(r) + "\n").collect()
}

/// Rules a binding in `scope` grants through `role_name`.
///
/// Looks at the cluster role of that name and, for namespaced bindings, the
/// role of that name in the binding's namespace. Cluster role rules come first.
#[must_use]
pub fn lookup_rules(permissions: &Permissions, scope: &Scope, role_name: &str) -> String {
    let namespaced = scope
        .namespace()
        .and_then(|ns| permissions.roles.get(ns))
        .and_then(|roles| roles.get(role_name))
        .map(|role| format_rules(&role.rules))
        .unwrap_or_default();
    let cluster = permissions
        .cluster_roles
        .get(role_name)
        .map(|role| format_rules(&role.rules))
        .unwrap_or_default();
    cluster + &namespaced
}
