//! Wire schema of the records `kubectl get -o json` returns.
//!
//! Only the fields the graph needs are modelled; everything else is ignored.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{RbackError, Result};
use crate::source::RecordKind;
use crate::types::AccessRule;

#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Every record carries `metadata`.
pub trait Record: DeserializeOwned {
    fn metadata(&self) -> &Metadata;
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountRecord {
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleRecord {
    pub metadata: Metadata,
    #[serde(default, deserialize_with = "crate::types::nullable")]
    pub rules: Vec<AccessRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleRefRecord {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubjectRecord {
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BindingRecord {
    pub metadata: Metadata,
    #[serde(rename = "roleRef")]
    pub role_ref: RoleRefRecord,
    /// `None` when the record has no subject list at all.
    #[serde(default)]
    pub subjects: Option<Vec<SubjectRecord>>,
}

impl Record for ServiceAccountRecord {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl Record for RoleRecord {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

impl Record for BindingRecord {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

#[derive(Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
struct ListEnvelope<T> {
    #[serde(default)]
    items: Option<Vec<T>>,
}

/// Decodes a payload holding either one record or a `List` envelope.
///
/// # Errors
/// Returns a resolution error if the payload is not JSON or a record does not
/// match the schema.
pub fn decode<T: Record>(kind: RecordKind, payload: &str) -> Result<Vec<T>> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| RbackError::resolution(kind, e))?;
    let is_list = value.get("kind").and_then(Value::as_str) == Some("List")
        || value.get("items").is_some();

    if is_list {
        let envelope: ListEnvelope<T> =
            serde_json::from_value(value).map_err(|e| RbackError::resolution(kind, e))?;
        Ok(envelope.items.unwrap_or_default())
    } else {
        let record = serde_json::from_value(value).map_err(|e| RbackError::resolution(kind, e))?;
        Ok(vec![record])
    }
}
