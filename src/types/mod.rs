//! Typed RBAC entities shared by the resolver, the filter and the graph assembler.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

mod kind;
pub use kind::ResourceKind;

/// Where an entity lives: the cluster itself or one namespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Cluster,
    Namespace(String),
}

impl Scope {
    /// Absent and empty namespaces both mean cluster scope.
    #[must_use]
    pub fn from_optional(namespace: Option<&str>) -> Self {
        match namespace {
            None | Some("") => Self::Cluster,
            Some(ns) => Self::Namespace(ns.to_string()),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::Cluster => None,
            Self::Namespace(ns) => Some(ns),
        }
    }

    #[must_use]
    pub fn is_cluster(&self) -> bool {
        matches!(self, Self::Cluster)
    }

    /// Segment used inside node ids; cluster scope is the empty segment.
    #[must_use]
    pub fn as_key(&self) -> &str {
        self.namespace().unwrap_or("")
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cluster => f.write_str("<cluster>"),
            Self::Namespace(ns) => f.write_str(ns),
        }
    }
}

/// The kind of a binding subject.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubjectKind {
    ServiceAccount,
    User,
    Group,
    Other(String),
}

impl SubjectKind {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "ServiceAccount" => Self::ServiceAccount,
            "User" => Self::User,
            "Group" => Self::Group,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ServiceAccount => "ServiceAccount",
            Self::User => "User",
            Self::Group => "Group",
            Self::Other(kind) => kind,
        }
    }

    /// The filter target that focuses subjects of this kind, if any.
    #[must_use]
    pub fn resource_kind(&self) -> Option<ResourceKind> {
        match self {
            Self::ServiceAccount => Some(ResourceKind::ServiceAccount),
            Self::User | Self::Group | Self::Other(_) => None,
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SubjectKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A subject that can be granted permissions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Identity {
    pub kind: SubjectKind,
    pub scope: Scope,
    pub name: String,
}

impl Identity {
    #[must_use]
    pub fn service_account(namespace: &str, name: &str) -> Self {
        Self {
            kind: SubjectKind::ServiceAccount,
            scope: Scope::from_optional(Some(namespace)),
            name: name.to_string(),
        }
    }
}

/// The role a binding grants. A cluster scope means a cluster role.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RoleRef {
    pub scope: Scope,
    pub name: String,
}

impl RoleRef {
    #[must_use]
    pub fn is_cluster_role(&self) -> bool {
        self.scope.is_cluster()
    }
}

/// A grant of one role to a list of subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub scope: Scope,
    pub name: String,
    pub role: RoleRef,
    pub subjects: Vec<Identity>,
}

impl Binding {
    #[must_use]
    pub fn is_cluster_binding(&self) -> bool {
        self.scope.is_cluster()
    }
}

/// A single permission statement of a role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    #[serde(default, deserialize_with = "nullable")]
    pub verbs: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub resources: Vec<String>,
    #[serde(default, rename = "resourceNames", deserialize_with = "nullable")]
    pub resource_names: Vec<String>,
    #[serde(default, rename = "nonResourceURLs", deserialize_with = "nullable")]
    pub non_resource_urls: Vec<String>,
    #[serde(default, rename = "apiGroups", deserialize_with = "nullable")]
    pub api_groups: Vec<String>,
}

/// A bundle of access rules, namespaced or cluster-wide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    pub scope: Scope,
    pub name: String,
    pub rules: Vec<AccessRule>,
}

/// Treats an explicit JSON `null` list like an absent one.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
