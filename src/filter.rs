// src/filter.rs
//! Decides which bindings and subjects a run renders and which nodes it highlights.

use std::collections::BTreeSet;

use crate::types::{Binding, Identity, ResourceKind, Scope, SubjectKind};

/// Prefix excluded when the user does not pass `--ignore-prefixes`.
pub const DEFAULT_IGNORE_PREFIX: &str = "system:";

/// Literal that turns prefix exclusion off.
pub const NO_EXCLUSIONS: &str = "none";

/// Namespaces a run is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NamespaceFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl NamespaceFilter {
    /// Parses a comma-delimited namespace list. Empty input or a `*` entry selects all.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let entries: BTreeSet<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
            .map(String::from)
            .collect();
        if entries.is_empty() || entries.contains("*") {
            Self::All
        } else {
            Self::Only(entries)
        }
    }

    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Cluster scope only matches when every namespace is selected.
    #[must_use]
    pub fn matches(&self, scope: &Scope) -> bool {
        match (self, scope) {
            (Self::All, _) => true,
            (Self::Only(_), Scope::Cluster) => false,
            (Self::Only(set), Scope::Namespace(ns)) => set.contains(ns),
        }
    }
}

/// Resource names a run is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NameFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl NameFilter {
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Self::All
        } else {
            Self::Only(set)
        }
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(name),
        }
    }

    /// True only for names listed explicitly; `All` names nothing.
    #[must_use]
    pub fn names_explicitly(&self, name: &str) -> bool {
        match self {
            Self::All => false,
            Self::Only(set) => set.contains(name),
        }
    }

    #[must_use]
    pub fn explicit(&self) -> Vec<String> {
        match self {
            Self::All => Vec::new(),
            Self::Only(set) => set.iter().cloned().collect(),
        }
    }
}

/// Name prefixes whose records are dropped before assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionFilter {
    prefixes: Vec<String>,
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self {
            prefixes: vec![DEFAULT_IGNORE_PREFIX.to_string()],
        }
    }
}

impl ExclusionFilter {
    #[must_use]
    pub fn none() -> Self {
        Self {
            prefixes: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Parses the `--ignore-prefixes` value; `none` disables exclusion.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == NO_EXCLUSIONS {
            return Self::none();
        }
        Self::from_prefixes(raw.split(',').map(str::trim))
    }

    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }

    #[cfg(test)]
    fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

/// The focus of one run: target kind, namespaces, names and exclusions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub target: Option<ResourceKind>,
    pub namespaces: NamespaceFilter,
    pub names: NameFilter,
    pub exclusions: ExclusionFilter,
}

impl FilterSpec {
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclusions.is_excluded(name)
    }

    /// Whether a binding is rendered at all.
    #[must_use]
    pub fn includes_binding(&self, binding: &Binding) -> bool {
        let role = &binding.role;
        match self.target {
            None => self.namespaces.matches(&binding.scope),
            Some(ResourceKind::ServiceAccount) => binding.subjects.iter().any(|s| {
                s.kind == SubjectKind::ServiceAccount
                    && self.namespaces.matches(&s.scope)
                    && self.names.matches(&s.name)
            }),
            Some(ResourceKind::Role) => {
                self.namespaces.matches(&role.scope) && self.names.matches(&role.name)
            }
            Some(ResourceKind::ClusterRole) => {
                (role.is_cluster_role() || self.namespaces.matches(&role.scope))
                    && self.names.matches(&role.name)
            }
            Some(ResourceKind::RoleBinding) => {
                self.namespaces.matches(&binding.scope) && self.names.matches(&binding.name)
            }
            Some(ResourceKind::ClusterRoleBinding) => {
                binding.is_cluster_binding() && self.names.matches(&binding.name)
            }
        }
    }

    /// Whether a subject of an included binding is rendered.
    #[must_use]
    pub fn includes_subject(&self, subject: &Identity) -> bool {
        match self.target {
            Some(ResourceKind::ServiceAccount) => {
                self.namespaces.matches(&subject.scope) && self.names.matches(&subject.name)
            }
            _ => true,
        }
    }

    /// Whether a node of `kind` is highlighted. Requires an explicit name match;
    /// cluster-scoped nodes only match when every namespace is selected.
    #[must_use]
    pub fn is_focused(&self, kind: ResourceKind, scope: &Scope, name: &str) -> bool {
        self.target == Some(kind)
            && self.namespaces.matches(scope)
            && self.names.names_explicitly(name)
    }

    /// Whether the standalone service account pass runs.
    #[must_use]
    pub fn renders_all_subjects(&self) -> bool {
        matches!(self.target, None | Some(ResourceKind::ServiceAccount))
    }
}
