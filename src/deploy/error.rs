// ABOUTME: Error types for slot resolution and deployment phases with SNAFU context selectors.
// ABOUTME: Phase errors carry the phase and failing item so callers never parse messages.

use snafu::Snafu;
use thiserror::Error;

use super::Phase;
use crate::bundle::BundleError;
use crate::target::TransportError;

/// Why a single phase call failed.
#[derive(Debug, Error)]
pub enum PhaseFailure {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("target answered with status {0}")]
    Status(u16),

    #[error(transparent)]
    Bundle(#[from] BundleError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors that end a deployment run.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DeployError {
    #[snafu(display("failed to query current slot: {source}"))]
    SlotQuery { source: TransportError },

    #[snafu(display("failed to query current slot: target answered with status {status}"))]
    SlotQueryStatus { status: u16 },

    #[snafu(display("cannot determine current slot (target reported {reported:?})"))]
    UnknownSlot { reported: String },

    #[snafu(display(
        "{phase} phase failed{}: {source}",
        item.as_deref().map(|i| format!(" for {i}")).unwrap_or_default()
    ))]
    Phase {
        phase: Phase,
        item: Option<String>,
        source: PhaseFailure,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// The current-slot query could not be completed.
    SlotQuery,
    /// The target reported a slot this strategy does not know.
    UnknownSlot,
    /// A phase call failed at the network level.
    Transport,
    /// A phase call returned something other than 204.
    Status,
    /// The bundler rejected the function sources.
    Bundle,
    /// A local file could not be read.
    Io,
}

impl DeployError {
    pub(crate) fn phase_failed(
        phase: Phase,
        item: Option<&str>,
        source: impl Into<PhaseFailure>,
    ) -> Self {
        DeployError::Phase {
            phase,
            item: item.map(str::to_string),
            source: source.into(),
        }
    }

    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::SlotQuery { .. } | DeployError::SlotQueryStatus { .. } => {
                DeployErrorKind::SlotQuery
            }
            DeployError::UnknownSlot { .. } => DeployErrorKind::UnknownSlot,
            DeployError::Phase { source, .. } => match source {
                PhaseFailure::Transport(_) => DeployErrorKind::Transport,
                PhaseFailure::Status(_) => DeployErrorKind::Status,
                PhaseFailure::Bundle(_) => DeployErrorKind::Bundle,
                PhaseFailure::Io(_) => DeployErrorKind::Io,
            },
        }
    }

    /// The phase that failed, or `None` if the run never got past slot resolution.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            DeployError::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// The secret key or static path that failed, if the phase works per item.
    pub fn item(&self) -> Option<&str> {
        match self {
            DeployError::Phase { item, .. } => item.as_deref(),
            _ => None,
        }
    }

    /// The unexpected status code the target answered with, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            DeployError::SlotQueryStatus { status } => Some(*status),
            DeployError::Phase {
                source: PhaseFailure::Status(status),
                ..
            } => Some(*status),
            _ => None,
        }
    }
}
