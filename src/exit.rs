// src/exit.rs
//! Standardized process exit codes for `rback`.
//!
//! Each error class of the render pipeline gets its own status so scripts can
//! tell a cluster outage apart from a malformed record.

use std::process::Termination;

use colored::Colorize;

use crate::error::RbackError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum RbackExit {
    /// Graph rendered and written.
    Success = 0,
    /// Generic error (IO, config).
    Error = 1,
    /// Unknown resource kind or malformed argument.
    InvalidInput = 2,
    /// The record source (kubectl, snapshot directory) failed.
    RetrievalFailed = 3,
    /// A payload was not valid JSON or lacked a required field.
    ResolutionFailed = 4,
    /// A binding, role or rule reference could not be turned into graph elements.
    AssemblyFailed = 5,
}

impl RbackExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Picks the exit status for a failed run.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<RbackError>() {
            Some(RbackError::Retrieval { .. }) => Self::RetrievalFailed,
            Some(RbackError::Resolution { .. }) => Self::ResolutionFailed,
            Some(RbackError::Assembly(_)) => Self::AssemblyFailed,
            Some(RbackError::InvalidInput(_)) => Self::InvalidInput,
            Some(RbackError::Config { .. } | RbackError::Io { .. }) | None => Self::Error,
        }
    }

    /// Prints the error to stderr and returns the matching exit status.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        eprintln!("{} {err:#}", "error:".red().bold());
        Self::for_error(err)
    }
}

impl Termination for RbackExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
