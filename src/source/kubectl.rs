//! Live retrieval through the `kubectl` binary.

use std::path::PathBuf;
use std::process::Command;
use std::time::Instant;

use tracing::debug;

use super::{Query, RecordSource};
use crate::config::SourceSettings;
use crate::error::{RbackError, Result};

/// Runs `kubectl get` once per query and captures its stdout.
#[derive(Debug, Clone)]
pub struct KubectlSource {
    binary: String,
    context: Option<String>,
    kubeconfig: Option<PathBuf>,
}

impl KubectlSource {
    #[must_use]
    pub fn new(settings: &SourceSettings) -> Self {
        Self {
            binary: settings.kubectl.clone(),
            context: settings.context.clone(),
            kubeconfig: settings.kubeconfig.clone(),
        }
    }

    /// Builds the argument list for `query`, without the binary itself.
    #[must_use]
    pub fn args(&self, query: &Query) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(kubeconfig) = &self.kubeconfig {
            args.push("--kubeconfig".to_string());
            args.push(kubeconfig.display().to_string());
        }
        if let Some(context) = &self.context {
            args.push("--context".to_string());
            args.push(context.clone());
        }
        args.push("get".to_string());
        args.push(query.kind.resource().to_string());

        let namespace = query.namespace.as_deref().filter(|_| query.kind.is_namespaced());
        match namespace {
            None if query.kind.is_namespaced() => args.push("--all-namespaces".to_string()),
            None => {}
            Some(ns) => {
                args.push("-n".to_string());
                args.push(ns.to_string());
            }
        }
        args.push("--output".to_string());
        args.push("json".to_string());
        if namespace.is_some() {
            args.extend(query.names.iter().cloned());
        }
        args
    }

    fn display(&self, args: &[String]) -> String {
        std::iter::once(self.binary.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl RecordSource for KubectlSource {
    fn fetch(&self, query: &Query) -> Result<String> {
        let args = self.args(query);
        let command = self.display(&args);
        let start = Instant::now();
        debug!(%command, "querying cluster");

        let output = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|e| RbackError::retrieval(query.kind, format!("failed to execute `{command}`: {e}")))?;

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(%command, duration_ms, status = ?output.status.code(), "query finished");

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map_or_else(|| "a signal".to_string(), |c| c.to_string());
            return Err(RbackError::retrieval(
                query.kind,
                format!("`{command}` exited with {code}: {}", stderr.trim()),
            ));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| RbackError::resolution(query.kind, format!("output is not UTF-8: {e}")))
    }
}
