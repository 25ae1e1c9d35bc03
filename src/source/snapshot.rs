//! Offline retrieval from a directory of saved `kubectl get -o json` dumps.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::debug;

use super::{Query, RecordKind, RecordSource};
use crate::error::{RbackError, Result};

/// Reads `<resource>.json` (for example `rolebindings.json`) from a directory.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    dir: PathBuf,
}

impl SnapshotSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn path_for(&self, kind: RecordKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.resource()))
    }
}

impl RecordSource for SnapshotSource {
    fn fetch(&self, query: &Query) -> Result<String> {
        let path = self.path_for(query.kind);
        debug!(path = %path.display(), "reading snapshot");
        let payload = fs::read_to_string(&path).map_err(|e| {
            RbackError::retrieval(query.kind, format!("cannot read {}: {e}", path.display()))
        })?;
        narrow(&payload, query)
    }
}

/// Applies a query's namespace and name selection to a full payload,
/// the way the API server would have narrowed it.
///
/// # Errors
/// Returns a resolution error if the payload is not JSON.
pub fn narrow(payload: &str, query: &Query) -> Result<String> {
    let Some(namespace) = query.namespace.as_deref().filter(|_| query.kind.is_namespaced())
    else {
        return Ok(payload.to_string());
    };

    let value: Value =
        serde_json::from_str(payload).map_err(|e| RbackError::resolution(query.kind, e))?;
    let items = match value.get("items") {
        Some(Value::Array(items)) => items.clone(),
        Some(_) => return Ok(payload.to_string()),
        None => vec![value],
    };

    let selected: Vec<Value> = items
        .into_iter()
        .filter(|item| selects(item, namespace, &query.names))
        .collect();
    Ok(json!({ "kind": "List", "items": selected }).to_string())
}

fn selects(item: &Value, namespace: &str, names: &[String]) -> bool {
    let metadata = item.get("metadata");
    let field = |key: &str| metadata.and_then(|m| m.get(key)).and_then(Value::as_str);
    field("namespace") == Some(namespace)
        && (names.is_empty() || field("name").is_some_and(|n| names.iter().any(|x| x == n)))
}
