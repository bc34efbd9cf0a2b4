// ABOUTME: Turns the function source tree into a single deployable artifact.
// ABOUTME: The default bundler shells out to esbuild with index.js as the entry point.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

/// Entry file looked up inside the function directory.
pub const ENTRY_FILE: &str = "index.js";

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("entry point not found: {}", .0.display())]
    MissingEntry(PathBuf),

    #[error("failed to run bundler {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bundling failed with {} diagnostic(s): {}", .diagnostics.len(), .diagnostics.join("; "))]
    Diagnostics { diagnostics: Vec<String> },

    #[error("bundler produced no output")]
    EmptyOutput,
}

/// Produces a deployable artifact from a source directory.
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn bundle(&self, source_dir: &Path) -> Result<Bytes, BundleError>;
}

/// Bundles with the `esbuild` executable for the node platform.
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    program: PathBuf,
}

impl EsbuildBundler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(entry: &Path) -> Vec<String> {
        vec![
            entry.display().to_string(),
            "--bundle".to_string(),
            "--platform=node".to_string(),
            "--log-level=error".to_string(),
        ]
    }
}

#[async_trait]
impl Bundler for EsbuildBundler {
    async fn bundle(&self, source_dir: &Path) -> Result<Bytes, BundleError> {
        let entry = source_dir.join(ENTRY_FILE);
        if !entry.is_file() {
            return Err(BundleError::MissingEntry(entry));
        }

        tracing::debug!("bundling {} with {}", entry.display(), self.program.display());

        let output = Command::new(&self.program)
            .args(Self::args(&entry))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| BundleError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut diagnostics: Vec<String> = stderr
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
            if diagnostics.is_empty() {
                diagnostics.push(format!("bundler exited with {}", output.status));
            }
            return Err(BundleError::Diagnostics { diagnostics });
        }

        if output.stdout.is_empty() {
            return Err(BundleError::EmptyOutput);
        }

        Ok(Bytes::from(output.stdout))
    }
}
