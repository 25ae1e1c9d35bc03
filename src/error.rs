// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

use crate::source::RecordKind;

#[derive(Debug, Error)]
pub enum RbackError {
    /// The record source could not deliver a payload.
    #[error("cannot retrieve {kind}: {message}")]
    Retrieval { kind: RecordKind, message: String },

    /// A payload was delivered but does not have the expected shape.
    #[error("malformed {kind} record: {message}")]
    Resolution { kind: RecordKind, message: String },

    /// A resolved record cannot be turned into graph elements.
    #[error("cannot assemble graph: {0}")]
    Assembly(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, RbackError>;

impl RbackError {
    pub(crate) fn resolution(kind: RecordKind, message: impl std::fmt::Display) -> Self {
        Self::Resolution {
            kind,
            message: message.to_string(),
        }
    }

    pub(crate) fn retrieval(kind: RecordKind, message: impl std::fmt::Display) -> Self {
        Self::Retrieval {
            kind,
            message: message.to_string(),
        }
    }

    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}
