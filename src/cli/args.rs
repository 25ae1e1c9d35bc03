use clap::Parser;
use std::path::PathBuf;

use crate::config::OutputFormat;
use crate::types::ResourceKind;

#[derive(Debug, Parser)]
#[command(
    name = "rback",
    version,
    about = "Renders Kubernetes RBAC permissions as a Graphviz graph"
)]
pub struct Cli {
    /// Kind to focus on: sa, r, cr, rb, crb (or their long names)
    #[arg(value_name = "KIND", value_parser = parse_kind)]
    pub kind: Option<ResourceKind>,
    /// Names of the resources to focus on
    #[arg(value_name = "NAME", requires = "kind")]
    pub names: Vec<String>,
    /// Namespaces to render, comma-delimited (all when omitted)
    #[arg(short = 'n', long = "namespaces", visible_alias = "namespace", default_value = "")]
    pub namespaces: String,
    /// Comma-delimited name prefixes to ignore ('none' to ignore nothing) [default: system:]
    #[arg(long, value_name = "PREFIXES")]
    pub ignore_prefixes: Option<String>,
    /// Whether to draw the legend
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub show_legend: Option<bool>,
    /// Whether to draw the access rules of each role
    #[arg(long, value_name = "BOOL", num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub render_rules: Option<bool>,
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Write the graph to a file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Read saved `kubectl get -o json` dumps from a directory instead of the cluster
    #[arg(long, value_name = "DIR")]
    pub from_dir: Option<PathBuf>,
    /// kubeconfig context to query
    #[arg(long)]
    pub context: Option<String>,
    #[arg(long, value_name = "FILE")]
    pub kubeconfig: Option<PathBuf>,
    /// Config file [default: ./rback.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Enable debug logging on stderr
    #[arg(long, short)]
    pub verbose: bool,
}

fn parse_kind(raw: &str) -> Result<ResourceKind, String> {
    raw.parse::<ResourceKind>().map_err(|e| e.to_string())
}
