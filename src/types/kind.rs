//! The resource kind a run focuses on.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::RbackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    ServiceAccount,
    Role,
    ClusterRole,
    RoleBinding,
    ClusterRoleBinding,
}

const ALIASES: &[(&str, ResourceKind)] = &[
    ("sa", ResourceKind::ServiceAccount),
    ("serviceaccount", ResourceKind::ServiceAccount),
    ("serviceaccounts", ResourceKind::ServiceAccount),
    ("r", ResourceKind::Role),
    ("role", ResourceKind::Role),
    ("roles", ResourceKind::Role),
    ("cr", ResourceKind::ClusterRole),
    ("clusterrole", ResourceKind::ClusterRole),
    ("clusterroles", ResourceKind::ClusterRole),
    ("rb", ResourceKind::RoleBinding),
    ("rolebinding", ResourceKind::RoleBinding),
    ("rolebindings", ResourceKind::RoleBinding),
    ("crb", ResourceKind::ClusterRoleBinding),
    ("clusterrolebinding", ResourceKind::ClusterRoleBinding),
    ("clusterrolebindings", ResourceKind::ClusterRoleBinding),
];

impl ResourceKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ServiceAccount => "serviceaccount",
            Self::Role => "role",
            Self::ClusterRole => "clusterrole",
            Self::RoleBinding => "rolebinding",
            Self::ClusterRoleBinding => "clusterrolebinding",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = RbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.to_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == token)
            .map(|(_, kind)| *kind)
            .ok_or_else(|| {
                RbackError::InvalidInput(format!(
                    "unknown resource kind '{s}' (expected sa, r, cr, rb or crb)"
                ))
            })
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
