// tests/common/mod.rs - In-memory record source and fixtures shared by the integration tests
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use rback_core::error::Result;
use rback_core::source::snapshot::narrow;
use rback_core::source::{Query, RecordKind, RecordSource};

/// Serves fixed payloads per kind and remembers every query it was asked.
#[derive(Default)]
pub struct MemorySource {
    payloads: BTreeMap<RecordKind, String>,
    queries: Mutex<Vec<Query>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: RecordKind, payload: &str) -> Self {
        self.payloads.insert(kind, payload.to_string());
        self
    }

    pub fn queries(&self) -> Vec<Query> {
        self.queries.lock().unwrap().clone()
    }

    pub fn queries_for(&self, kind: RecordKind) -> Vec<Query> {
        self.queries().into_iter().filter(|q| q.kind == kind).collect()
    }
}

impl RecordSource for MemorySource {
    fn fetch(&self, query: &Query) -> Result<String> {
        self.queries.lock().unwrap().push(query.clone());
        let payload = self
            .payloads
            .get(&query.kind)
            .cloned()
            .unwrap_or_else(|| r#"{"kind":"List","items":[]}"#.to_string());
        narrow(&payload, query)
    }
}

/// Two service accounts in `ci`, one binding `deployers` granting `deploy-role` to `build-bot`.
pub fn ci_cluster() -> MemorySource {
    MemorySource::new()
        .with(
            RecordKind::ServiceAccounts,
            r#"{"kind":"List","items":[
                {"metadata":{"name":"build-bot","namespace":"ci"}},
                {"metadata":{"name":"default","namespace":"ci"}}
            ]}"#,
        )
        .with(
            RecordKind::Roles,
            r#"{"kind":"List","items":[
                {"metadata":{"name":"deploy-role","namespace":"ci"},
                 "rules":[{"verbs":["create","update"],"resources":["deployments"],"apiGroups":["apps"]}]}
            ]}"#,
        )
        .with(
            RecordKind::RoleBindings,
            r#"{"kind":"List","items":[
                {"metadata":{"name":"deployers","namespace":"ci"},
                 "roleRef":{"kind":"Role","name":"deploy-role","namespace":"ci"},
                 "subjects":[{"kind":"ServiceAccount","name":"build-bot","namespace":"ci"}]}
            ]}"#,
        )
}

/// Cluster roles `view`, `edit` and `system:admin`, each bound once.
pub fn cluster_roles() -> MemorySource {
    MemorySource::new()
        .with(
            RecordKind::ClusterRoles,
            r#"{"kind":"List","items":[
                {"metadata":{"name":"view"},"rules":[{"verbs":["get","list"],"resources":["pods"],"apiGroups":[""]}]},
                {"metadata":{"name":"edit"},"rules":[{"verbs":["*"],"resources":["pods"],"apiGroups":[""]}]},
                {"metadata":{"name":"system:admin"},"rules":[{"verbs":["*"],"resources":["*"],"apiGroups":["*"]}]}
            ]}"#,
        )
        .with(
            RecordKind::ClusterRoleBindings,
            r#"{"kind":"List","items":[
                {"metadata":{"name":"viewers"},"roleRef":{"kind":"ClusterRole","name":"view"},
                 "subjects":[{"kind":"User","name":"alice"}]},
                {"metadata":{"name":"admins"},"roleRef":{"kind":"ClusterRole","name":"system:admin"},
                 "subjects":[{"kind":"Group","name":"ops"}]}
            ]}"#,
        )
        .with(
            RecordKind::RoleBindings,
            r#"{"kind":"List","items":[
                {"metadata":{"name":"editors","namespace":"dev"},"roleRef":{"kind":"ClusterRole","name":"edit"},
                 "subjects":[{"kind":"User","name":"bob"}]}
            ]}"#,
        )
}
