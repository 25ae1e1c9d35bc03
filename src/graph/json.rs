//! JSON serialization of the abstract graph, for tooling that draws its own diagrams.

use super::Graph;
use crate::error::{RbackError, Result};

/// # Errors
/// Returns an assembly error if the graph cannot be serialized.
pub fn write(graph: &Graph) -> Result<String> {
    serde_json::to_string_pretty(graph)
        .map(|mut out| {
            out.push('\n');
            out
        })
        .map_err(|e| RbackError::Assembly(format!("cannot serialize graph: {e}")))
}
