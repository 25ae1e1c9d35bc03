// src/render.rs
//! One run of the pipeline: resolve, assemble, serialize.

use tracing::info;

use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::graph::{self, dot, json};
use crate::resolve;
use crate::source::RecordSource;

/// Fetches the records from `source` and returns the serialized graph.
///
/// # Errors
/// Returns the first retrieval, resolution or assembly error; nothing is
/// rendered in that case.
pub fn render(source: &dyn RecordSource, config: &Config) -> Result<String> {
    let permissions = resolve::resolve(source, &config.filter, config.source.parallel)?;
    let graph = graph::assemble(&permissions, &config.filter, &config.render)?;
    info!(format = ?config.format, "serializing graph");
    match config.format {
        OutputFormat::Dot => Ok(dot::write(&graph)),
        OutputFormat::Json => json::write(&graph),
    }
}
