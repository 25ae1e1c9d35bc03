// src/source/mod.rs
//! Retrieval of raw RBAC records.
//!
//! A [`RecordSource`] answers one [`Query`] with the raw JSON payload that
//! `kubectl get ... --output json` would print: either a single record or a
//! `{"kind": "List", "items": [...]}` envelope.

pub mod kubectl;
pub mod snapshot;

use serde::Serialize;
use std::fmt;

use crate::error::Result;

pub use kubectl::KubectlSource;
pub use snapshot::SnapshotSource;

/// The record kinds the resolver asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RecordKind {
    ServiceAccounts,
    Roles,
    RoleBindings,
    ClusterRoles,
    ClusterRoleBindings,
}

impl RecordKind {
    pub const ALL: [Self; 5] = [
        Self::ServiceAccounts,
        Self::Roles,
        Self::RoleBindings,
        Self::ClusterRoles,
        Self::ClusterRoleBindings,
    ];

    /// The resource name understood by `kubectl get`.
    #[must_use]
    pub fn resource(self) -> &'static str {
        match self {
            Self::ServiceAccounts => "serviceaccounts",
            Self::Roles => "roles",
            Self::RoleBindings => "rolebindings",
            Self::ClusterRoles => "clusterroles",
            Self::ClusterRoleBindings => "clusterrolebindings",
        }
    }

    #[must_use]
    pub fn is_namespaced(self) -> bool {
        matches!(self, Self::ServiceAccounts | Self::Roles | Self::RoleBindings)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

/// One request to a record source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub kind: RecordKind,
    /// `None` asks for every namespace. Ignored for cluster-scoped kinds.
    pub namespace: Option<String>,
    /// Only honoured together with an explicit namespace.
    pub names: Vec<String>,
}

impl Query {
    #[must_use]
    pub fn all(kind: RecordKind) -> Self {
        Self {
            kind,
            namespace: None,
            names: Vec::new(),
        }
    }

    #[must_use]
    pub fn in_namespace(kind: RecordKind, namespace: &str, names: &[String]) -> Self {
        Self {
            kind,
            namespace: Some(namespace.to_string()),
            names: names.to_vec(),
        }
    }
}

/// Anything that can answer record queries.
pub trait RecordSource: Sync {
    /// Returns the raw JSON payload for `query`.
    ///
    /// # Errors
    /// Returns [`crate::error::RbackError::Retrieval`] when the payload cannot be obtained.
    fn fetch(&self, query: &Query) -> Result<String>;
}
