// src/resolve/mod.rs
//! Turns raw record payloads into the typed [`Permissions`] snapshot.

pub mod bindings;
pub mod records;

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use self::records::{decode, BindingRecord, Record, RoleRecord, ServiceAccountRecord};
use crate::error::{RbackError, Result};
use crate::filter::{FilterSpec, NamespaceFilter};
use crate::source::{Query, RecordKind, RecordSource};
use crate::types::{Identity, ResourceKind, Role, Scope};

type Namespaced<T> = BTreeMap<String, BTreeMap<String, T>>;

/// Everything one run knows about the cluster's access control.
#[derive(Debug, Clone, Default)]
pub struct Permissions {
    /// namespace -> name -> service account
    pub service_accounts: Namespaced<Identity>,
    /// namespace -> name -> role
    pub roles: Namespaced<Role>,
    /// name -> cluster role
    pub cluster_roles: BTreeMap<String, Role>,
    /// Role bindings keyed by their namespace, cluster role bindings under [`Scope::Cluster`].
    pub bindings: BTreeMap<Scope, BTreeMap<String, BindingRecord>>,
}

impl Permissions {
    /// Namespaces that hold service accounts, role bindings or roles.
    #[must_use]
    pub fn namespaces(&self) -> BTreeSet<String> {
        let bound = self
            .bindings
            .keys()
            .filter_map(Scope::namespace)
            .map(String::from);
        self.service_accounts
            .keys()
            .cloned()
            .chain(bound)
            .chain(self.roles.keys().cloned())
            .collect()
    }
}

/// Fetches and resolves every record kind.
///
/// With `parallel` set the five kinds are fetched concurrently; the result is
/// identical to a sequential run.
///
/// # Errors
/// Returns the first retrieval or resolution error in fetch order.
pub fn resolve(
    source: &dyn RecordSource,
    filter: &FilterSpec,
    parallel: bool,
) -> Result<Permissions> {
    let resolver = Resolver { source, filter };
    let permissions = if parallel {
        resolver.resolve_parallel()?
    } else {
        resolver.resolve_sequential()?
    };
    debug!(
        namespaces = permissions.namespaces().len(),
        cluster_roles = permissions.cluster_roles.len(),
        binding_scopes = permissions.bindings.len(),
        "permissions resolved"
    );
    Ok(permissions)
}

struct Resolver<'a> {
    source: &'a dyn RecordSource,
    filter: &'a FilterSpec,
}

impl Resolver<'_> {
    fn resolve_sequential(&self) -> Result<Permissions> {
        let service_accounts = self.service_accounts()?;
        let roles = self.roles()?;
        let role_bindings = self.role_bindings()?;
        let cluster_roles = self.cluster_roles()?;
        let cluster_bindings = self.cluster_role_bindings()?;
        Ok(merge(service_accounts, roles, role_bindings, cluster_roles, cluster_bindings))
    }

    fn resolve_parallel(&self) -> Result<Permissions> {
        let ((service_accounts, roles), ((role_bindings, cluster_roles), cluster_bindings)) =
            rayon::join(
                || rayon::join(|| self.service_accounts(), || self.roles()),
                || {
                    rayon::join(
                        || rayon::join(|| self.role_bindings(), || self.cluster_roles()),
                        || self.cluster_role_bindings(),
                    )
                },
            );
        Ok(merge(
            service_accounts?,
            roles?,
            role_bindings?,
            cluster_roles?,
            cluster_bindings?,
        ))
    }

    fn service_accounts(&self) -> Result<Namespaced<Identity>> {
        let names = if self.filter.target == Some(ResourceKind::ServiceAccount) {
            self.filter.names.explicit()
        } else {
            Vec::new()
        };
        let records: Namespaced<ServiceAccountRecord> = self.fetch_namespaced(
            RecordKind::ServiceAccounts,
            &self.filter.namespaces,
            &names,
        )?;
        Ok(records
            .into_iter()
            .map(|(ns, accounts)| {
                let identities = accounts
                    .into_keys()
                    .map(|name| {
                        let identity = Identity::service_account(&ns, &name);
                        (name, identity)
                    })
                    .collect();
                (ns, identities)
            })
            .collect())
    }

    fn roles(&self) -> Result<Namespaced<Role>> {
        let records: Namespaced<RoleRecord> =
            self.fetch_namespaced(RecordKind::Roles, &NamespaceFilter::All, &[])?;
        Ok(records
            .into_iter()
            .map(|(ns, roles)| {
                let scope = Scope::Namespace(ns.clone());
                let typed = roles
                    .into_iter()
                    .map(|(name, record)| {
                        let role = Role {
                            scope: scope.clone(),
                            name: name.clone(),
                            rules: record.rules,
                        };
                        (name, role)
                    })
                    .collect();
                (ns, typed)
            })
            .collect())
    }

    fn role_bindings(&self) -> Result<Namespaced<BindingRecord>> {
        self.fetch_namespaced(RecordKind::RoleBindings, &NamespaceFilter::All, &[])
    }

    fn cluster_roles(&self) -> Result<BTreeMap<String, Role>> {
        let records: BTreeMap<String, RoleRecord> = self.fetch_cluster(RecordKind::ClusterRoles)?;
        Ok(records
            .into_iter()
            .map(|(name, record)| {
                let role = Role {
                    scope: Scope::Cluster,
                    name: name.clone(),
                    rules: record.rules,
                };
                (name, role)
            })
            .collect())
    }

    fn cluster_role_bindings(&self) -> Result<BTreeMap<String, BindingRecord>> {
        self.fetch_cluster(RecordKind::ClusterRoleBindings)
    }

    /// One query across all namespaces, or one query per selected namespace.
    fn fetch_namespaced<T: Record>(
        &self,
        kind: RecordKind,
        namespaces: &NamespaceFilter,
        names: &[String],
    ) -> Result<Namespaced<T>> {
        let queries = match namespaces {
            NamespaceFilter::All => vec![Query::all(kind)],
            NamespaceFilter::Only(set) => set
                .iter()
                .map(|ns| Query::in_namespace(kind, ns, names))
                .collect(),
        };

        let mut result: Namespaced<T> = BTreeMap::new();
        for query in &queries {
            let payload = self.source.fetch(query)?;
            for record in decode::<T>(kind, &payload)? {
                let metadata = record.metadata();
                if self.filter.is_excluded(&metadata.name) {
                    continue;
                }
                let Some(ns) = metadata.namespace.clone().filter(|ns| !ns.is_empty()) else {
                    return Err(RbackError::resolution(
                        kind,
                        format!("'{}' has no metadata.namespace", metadata.name),
                    ));
                };
                let name = metadata.name.clone();
                result.entry(ns).or_default().insert(name, record);
            }
        }
        debug!(%kind, queries = queries.len(), namespaces = result.len(), "resolved namespaced records");
        Ok(result)
    }

    fn fetch_cluster<T: Record>(&self, kind: RecordKind) -> Result<BTreeMap<String, T>> {
        let payload = self.source.fetch(&Query::all(kind))?;
        let mut result = BTreeMap::new();
        for record in decode::<T>(kind, &payload)? {
            if self.filter.is_excluded(&record.metadata().name) {
                continue;
            }
            result.insert(record.metadata().name.clone(), record);
        }
        debug!(%kind, records = result.len(), "resolved cluster records");
        Ok(result)
    }
}

fn merge(
    service_accounts: Namespaced<Identity>,
    roles: Namespaced<Role>,
    role_bindings: Namespaced<BindingRecord>,
    cluster_roles: BTreeMap<String, Role>,
    cluster_bindings: BTreeMap<String, BindingRecord>,
) -> Permissions {
    let mut bindings: BTreeMap<Scope, BTreeMap<String, BindingRecord>> = role_bindings
        .into_iter()
        .map(|(ns, records)| (Scope::Namespace(ns), records))
        .collect();
    if !cluster_bindings.is_empty() {
        bindings.insert(Scope::Cluster, cluster_bindings);
    }
    Permissions {
        service_accounts,
        roles,
        cluster_roles,
        bindings,
    }
}
