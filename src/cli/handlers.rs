// src/cli/handlers.rs
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use super::args::Cli;
use crate::config::{Config, RbackToml, RenderOptions};
use crate::error::RbackError;
use crate::exit::RbackExit;
use crate::filter::{ExclusionFilter, FilterSpec, NameFilter, NamespaceFilter};
use crate::render::render;
use crate::source::{KubectlSource, SnapshotSource};

/// Handles a render invocation.
///
/// # Errors
/// Returns error if the config cannot be loaded, any record cannot be
/// retrieved or resolved, or the output cannot be written.
pub fn handle_render(cli: &Cli) -> Result<RbackExit> {
    let file = RbackToml::load(cli.config.as_deref()).context("loading configuration")?;
    let config = build_config(cli, file);
    debug!(filter = ?config.filter, "effective filter");

    let graph = match &config.snapshot_dir {
        Some(dir) => render(&SnapshotSource::new(dir), &config),
        None => render(&KubectlSource::new(&config.source), &config),
    }
    .context("rendering permissions")?;

    emit(&graph, config.output.as_deref())?;
    Ok(RbackExit::Success)
}

/// Merges `rback.toml` with the command line; flags win.
#[must_use]
pub fn build_config(cli: &Cli, file: RbackToml) -> Config {
    let exclusions = match &cli.ignore_prefixes {
        Some(raw) => ExclusionFilter::parse(raw),
        None => ExclusionFilter::from_prefixes(file.filter.ignore_prefixes),
    };
    let filter = FilterSpec {
        target: cli.kind,
        namespaces: NamespaceFilter::parse(&cli.namespaces),
        names: NameFilter::from_names(cli.names.iter().cloned()),
        exclusions,
    };

    let mut source = file.source;
    if cli.context.is_some() {
        source.context.clone_from(&cli.context);
    }
    if cli.kubeconfig.is_some() {
        source.kubeconfig.clone_from(&cli.kubeconfig);
    }

    Config {
        filter,
        render: RenderOptions {
            show_legend: cli.show_legend.unwrap_or(file.render.show_legend),
            render_rules: cli.render_rules.unwrap_or(file.render.render_rules),
        },
        format: cli.format.unwrap_or(file.render.format),
        source,
        snapshot_dir: cli.from_dir.clone(),
        output: cli.output.clone(),
    }
}

fn emit(graph: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, graph).map_err(|e| RbackError::io(e, path))?;
            debug!(path = %path.display(), bytes = graph.len(), "graph written");
        }
        None => print!("{graph}"),
    }
    Ok(())
}
