// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Runs begin, secrets, function, statics and activate against one slot, stopping at the first failure.

mod deployment;
mod error;
mod phase;
mod state;
mod transitions;

use std::path::PathBuf;

pub use deployment::{DeployReport, Deployment};
pub use error::{DeployError, DeployErrorKind, PhaseFailure};
pub(crate) use error::SlotQuerySnafu;
pub use phase::Phase;
pub use state::{Activated, Begun, FunctionDeployed, Resolved, SecretsDeployed, StaticsDeployed};

use crate::bundle::Bundler;
use crate::output::Output;
use crate::secrets::Secrets;
use crate::target::Transport;
use crate::types::DeployId;

/// Local inputs for one run.
#[derive(Debug, Clone)]
pub struct DeploySources {
    pub func_dir: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub secrets: Secrets,
}

/// Run every phase against `id` in order.
///
/// The first failing call ends the run; activation is only reached when
/// every earlier phase was accepted.
pub async fn run_phases<T, B>(
    id: DeployId,
    sources: &DeploySources,
    target: &T,
    bundler: &B,
    output: &Output,
) -> Result<DeployReport, DeployError>
where
    T: Transport + ?Sized,
    B: Bundler + ?Sized,
{
    let deployment = Deployment::new(id)
        .begin(target, output)
        .await?
        .deploy_secrets(target, &sources.secrets, output)
        .await?
        .deploy_function(target, bundler, &sources.func_dir, output)
        .await?
        .deploy_statics(target, sources.static_dir.as_deref(), output)
        .await?
        .activate(target, output)
        .await?;

    Ok(deployment.finish())
}
