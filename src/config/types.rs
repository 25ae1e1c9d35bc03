use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::filter::DEFAULT_IGNORE_PREFIX;

/// Serialization of the assembled graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Graphviz DOT
    #[default]
    Dot,
    /// The abstract graph description as JSON
    Json,
}

/// Which optional parts of the graph are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_legend: bool,
    pub render_rules: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_legend: true,
            render_rules: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    #[serde(default = "default_true")]
    pub show_legend: bool,
    #[serde(default = "default_true")]
    pub render_rules: bool,
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            show_legend: true,
            render_rules: true,
            format: OutputFormat::Dot,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSettings {
    #[serde(default = "default_ignore_prefixes")]
    pub ignore_prefixes: Vec<String>,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            ignore_prefixes: default_ignore_prefixes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    #[serde(default = "default_kubectl")]
    pub kubectl: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub kubeconfig: Option<PathBuf>,
    /// Fetch the record kinds concurrently.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kubectl: default_kubectl(),
            context: None,
            kubeconfig: None,
            parallel: false,
        }
    }
}

/// Contents of `rback.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RbackToml {
    #[serde(default)]
    pub render: RenderSettings,
    #[serde(default)]
    pub filter: FilterSettings,
    #[serde(default)]
    pub source: SourceSettings,
}

const fn default_true() -> bool { true }
fn default_kubectl() -> String { "kubectl".to_string() }
fn default_ignore_prefixes() -> Vec<String> { vec![DEFAULT_IGNORE_PREFIX.to_string()] }
