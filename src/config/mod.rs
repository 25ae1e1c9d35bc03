// src/config/mod.rs
pub mod types;

pub use self::types::{
    FilterSettings, OutputFormat, RbackToml, RenderOptions, RenderSettings, SourceSettings,
};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{RbackError, Result};
use crate::filter::FilterSpec;

/// Name of the optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "rback.toml";

impl RbackToml {
    /// Loads `explicit`, or `rback.toml` from the working directory when present.
    ///
    /// # Errors
    /// Returns error if an explicitly named file cannot be read, or if a file
    /// exists but is not valid TOML for this schema.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(CONFIG_FILE);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };
        let content = fs::read_to_string(&path).map_err(|e| RbackError::io(e, &path))?;
        debug!(path = %path.display(), "loaded config");
        Self::parse(&content, &path)
    }

    /// # Errors
    /// Returns a config error naming `path` if `content` does not parse.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| RbackError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Effective settings of one run, after merging `rback.toml` and the command line.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub filter: FilterSpec,
    pub render: RenderOptions,
    pub format: OutputFormat,
    pub source: SourceSettings,
    /// Read records from this directory instead of the cluster.
    pub snapshot_dir: Option<PathBuf>,
    /// Write the graph here instead of stdout.
    pub output: Option<PathBuf>,
}
