//! Binding index: typed bindings with their role reference and subjects.

use std::collections::BTreeMap;

use tracing::debug;

use super::records::{BindingRecord, SubjectRecord};
use crate::error::{RbackError, Result};
use crate::filter::ExclusionFilter;
use crate::types::{Binding, Identity, RoleRef, Scope, SubjectKind};

/// Resolves every binding record of one scope.
///
/// Bindings without a subject list and bindings to an excluded role are left
/// out; the returned list keeps the records' name order.
///
/// # Errors
/// Returns an assembly error if a role reference or subject has no name.
pub fn index(
    scope: &Scope,
    records: &BTreeMap<String, BindingRecord>,
    exclusions: &ExclusionFilter,
) -> Result<Vec<Binding>> {
    let mut bindings = Vec::with_capacity(records.len());
    for (name, record) in records {
        if let Some(binding) = resolve(scope, name, record, exclusions)? {
            bindings.push(binding);
        }
    }
    Ok(bindings)
}

fn resolve(
    scope: &Scope,
    name: &str,
    record: &BindingRecord,
    exclusions: &ExclusionFilter,
) -> Result<Option<Binding>> {
    let Some(subjects) = &record.subjects else {
        debug!(%scope, binding = name, "binding has no subjects; skipping");
        return Ok(None);
    };

    let role_name = record.role_ref.name.as_str();
    if role_name.is_empty() {
        return Err(RbackError::Assembly(format!(
            "binding '{name}' in {scope} references a role without a name"
        )));
    }
    if exclusions.is_excluded(role_name) {
        debug!(%scope, binding = name, role = role_name, "binding targets an ignored role; skipping");
        return Ok(None);
    }

    let subjects = subjects
        .iter()
        .map(|s| subject(scope, name, s))
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(Binding {
        scope: scope.clone(),
        name: name.to_string(),
        role: RoleRef {
            scope: Scope::from_optional(record.role_ref.namespace.as_deref()),
            name: role_name.to_string(),
        },
        subjects,
    }))
}

fn subject(scope: &Scope, binding: &str, record: &SubjectRecord) -> Result<Identity> {
    if record.name.is_empty() || record.kind.is_empty() {
        return Err(RbackError::Assembly(format!(
            "binding '{binding}' in {scope} has a subject without kind or name"
        )));
    }
    Ok(Identity {
        kind: SubjectKind::parse(&record.kind),
        scope: Scope::from_optional(record.namespace.as_deref()),
        name: record.name.clone(),
    })
}
