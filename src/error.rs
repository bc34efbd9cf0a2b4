// ABOUTME: Application-wide error types for atroctl.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::deploy::DeployError;
use crate::strategy::UnsupportedStrategy;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error(transparent)]
    UnsupportedStrategy(#[from] UnsupportedStrategy),

    #[error("invalid target URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("failed to start file watcher: {0}")]
    WatcherInit(#[source] notify::Error),

    #[error("failed to watch {}: {source}", .path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
