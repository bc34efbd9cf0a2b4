// ABOUTME: Phase methods for deployment orchestration.
// ABOUTME: Each method consumes self, issues its calls in order, and returns the next state on success.

use bytes::Bytes;
use std::path::Path;

use crate::assets::{self, StaticFile};
use crate::bundle::Bundler;
use crate::output::Output;
use crate::secrets::Secrets;
use crate::target::{Endpoint, Transport};
use crate::types::DeployId;

use super::Deployment;
use super::error::{DeployError, PhaseFailure};
use super::phase::Phase;
use super::state::{
    Activated, Begun, FunctionDeployed, Resolved, SecretsDeployed, StaticsDeployed,
};

/// Content type for phase calls that do not carry a sniffed asset.
const TEXT_PLAIN: &str = "text/plain";

// =============================================================================
// Internal Helpers
// =============================================================================

/// Issue one call and require `204`. Narrates the outcome of an item whose
/// start marker the caller already printed.
async fn deliver<T: Transport + ?Sized>(
    target: &T,
    endpoint: Endpoint<'_>,
    content_type: &str,
    body: Bytes,
    phase: Phase,
    item: &str,
    output: &Output,
) -> Result<(), DeployError> {
    match target.call(endpoint, content_type, body).await {
        Ok(resp) if resp.is_accepted() => {
            output.item_finished(phase, item, Some(resp.status), true);
            Ok(())
        }
        Ok(resp) => {
            output.item_finished(phase, item, Some(resp.status), false);
            Err(DeployError::phase_failed(
                phase,
                Some(item),
                PhaseFailure::Status(resp.status),
            ))
        }
        Err(e) => {
            output.item_finished(phase, item, None, false);
            Err(DeployError::phase_failed(phase, Some(item), e))
        }
    }
}

/// Begin and Activate: a bodyless POST. The slot is narrated as the item,
/// but the phase error carries none.
async fn notify<T: Transport + ?Sized>(
    target: &T,
    endpoint: Endpoint<'_>,
    phase: Phase,
    id: &DeployId,
    output: &Output,
) -> Result<(), DeployError> {
    output.item_started(phase, &format!("notifying target for {id}"));
    match target.call(endpoint, TEXT_PLAIN, Bytes::new()).await {
        Ok(resp) if resp.is_accepted() => {
            output.item_finished(phase, id.as_str(), Some(resp.status), true);
            Ok(())
        }
        Ok(resp) => {
            output.item_finished(phase, id.as_str(), Some(resp.status), false);
            Err(DeployError::phase_failed(
                phase,
                None,
                PhaseFailure::Status(resp.status),
            ))
        }
        Err(e) => {
            output.item_finished(phase, id.as_str(), None, false);
            Err(DeployError::phase_failed(phase, None, e))
        }
    }
}

// =============================================================================
// Resolved -> Begun
// =============================================================================

impl Deployment<Resolved> {
    /// Tell the target a deployment to this slot is starting.
    ///
    /// # Errors
    ///
    /// Returns a `Begin` phase error if the call fails or is not accepted.
    #[must_use = "deployment state must be used"]
    pub async fn begin<T: Transport + ?Sized>(
        self,
        target: &T,
        output: &Output,
    ) -> Result<Deployment<Begun>, DeployError> {
        let id = self.id();
        output.phase(Phase::Begin, &format!("starting deployment {id}"));

        notify(target, Endpoint::Begin(id), Phase::Begin, id, output).await?;

        output.phase(
            Phase::Begin,
            &format!("successfully started deployment {id}"),
        );
        tracing::info!(id = %id, "deployment begun");
        Ok(self.transition())
    }
}

// =============================================================================
// Begun -> SecretsDeployed
// =============================================================================

impl Deployment<Begun> {
    /// Write every secret to the slot's secret store, one call per secret.
    ///
    /// # Errors
    ///
    /// Stops at the first secret that is not accepted; the error names its key.
    #[must_use = "deployment state must be used"]
    pub async fn deploy_secrets<T: Transport + ?Sized>(
        self,
        target: &T,
        secrets: &Secrets,
        output: &Output,
    ) -> Result<Deployment<SecretsDeployed>, DeployError> {
        output.phase(Phase::Secrets, "starting to deploy secrets");

        for entry in secrets.iter() {
            output.item_started(Phase::Secrets, &format!("deploying {}", entry.key));
            deliver(
                target,
                Endpoint::Secret(self.id(), &entry.key),
                TEXT_PLAIN,
                Bytes::from(entry.value.clone()),
                Phase::Secrets,
                &entry.key,
                output,
            )
            .await?;
        }

        output.phase(Phase::Secrets, "successfully deployed");
        tracing::info!(id = %self.id(), count = secrets.len(), "secrets deployed");

        let mut next: Deployment<SecretsDeployed> = self.transition();
        next.report.secrets = secrets.len();
        Ok(next)
    }
}

// =============================================================================
// SecretsDeployed -> FunctionDeployed
// =============================================================================

impl Deployment<SecretsDeployed> {
    /// Bundle the function sources and upload the artifact as a single unit.
    ///
    /// # Errors
    ///
    /// Returns a `Function` phase error, naming the source directory, if
    /// bundling fails or the upload is not accepted.
    #[must_use = "deployment state must be used"]
    pub async fn deploy_function<T: Transport + ?Sized, B: Bundler + ?Sized>(
        self,
        target: &T,
        bundler: &B,
        func_dir: &Path,
        output: &Output,
    ) -> Result<Deployment<FunctionDeployed>, DeployError> {
        let dir = func_dir.display().to_string();
        output.phase(
            Phase::Function,
            &format!("starting to deploy functions in '{dir}'"),
        );

        output.item_started(Phase::Function, "creating bundle");
        let artifact = match bundler.bundle(func_dir).await {
            Ok(artifact) => {
                output.item_finished(Phase::Function, &dir, None, true);
                artifact
            }
            Err(e) => {
                output.item_finished(Phase::Function, &dir, None, false);
                return Err(DeployError::phase_failed(Phase::Function, Some(&dir), e));
            }
        };

        let size = artifact.len();
        output.item_started(Phase::Function, "deploying bundle");
        deliver(
            target,
            Endpoint::Function(self.id()),
            TEXT_PLAIN,
            artifact,
            Phase::Function,
            &dir,
            output,
        )
        .await?;

        output.phase(Phase::Function, "successfully deployed");
        tracing::info!(id = %self.id(), bytes = size, "function deployed");

        let mut next: Deployment<FunctionDeployed> = self.transition();
        next.report.function_bytes = size;
        Ok(next)
    }
}

// =============================================================================
// FunctionDeployed -> StaticsDeployed
// =============================================================================

impl Deployment<FunctionDeployed> {
    /// Upload every non-hidden file under `static_dir`. Without a static
    /// directory this makes no calls.
    ///
    /// # Errors
    ///
    /// Stops at the first file that cannot be read or is not accepted; the
    /// error names its relative path.
    #[must_use = "deployment state must be used"]
    pub async fn deploy_statics<T: Transport + ?Sized>(
        self,
        target: &T,
        static_dir: Option<&Path>,
        output: &Output,
    ) -> Result<Deployment<StaticsDeployed>, DeployError> {
        let Some(dir) = static_dir else {
            return Ok(self.transition());
        };

        output.phase(
            Phase::Statics,
            &format!("starting to deploy static files in '{}'", dir.display()),
        );

        let files = assets::list_files(dir).map_err(|e| {
            DeployError::phase_failed(Phase::Statics, Some(&dir.display().to_string()), e)
        })?;

        for path in &files {
            let file = StaticFile::load(dir, path).map_err(|e| {
                DeployError::phase_failed(Phase::Statics, Some(&path.display().to_string()), e)
            })?;

            output.item_started(
                Phase::Statics,
                &format!("deploying file {}", file.relative_path),
            );
            deliver(
                target,
                Endpoint::Static(self.id(), &file.relative_path),
                file.content_type,
                file.contents.clone(),
                Phase::Statics,
                &file.relative_path,
                output,
            )
            .await?;
        }

        output.phase(Phase::Statics, "successfully deployed");
        tracing::info!(id = %self.id(), count = files.len(), "statics deployed");

        let mut next: Deployment<StaticsDeployed> = self.transition();
        next.report.statics = files.len();
        Ok(next)
    }
}

// =============================================================================
// StaticsDeployed -> Activated
// =============================================================================

impl Deployment<StaticsDeployed> {
    /// Switch live traffic to this slot. Always the last call of a run.
    ///
    /// # Errors
    ///
    /// Returns an `Activate` phase error if the call fails or is not accepted.
    #[must_use = "deployment state must be used"]
    pub async fn activate<T: Transport + ?Sized>(
        self,
        target: &T,
        output: &Output,
    ) -> Result<Deployment<Activated>, DeployError> {
        let id = self.id();
        output.phase(Phase::Activate, &format!("starting to activate {id}"));

        notify(target, Endpoint::Activate(id), Phase::Activate, id, output).await?;

        output.phase(Phase::Activate, &format!("successfully activated {id}"));
        tracing::info!(id = %id, "deployment activated");
        Ok(self.transition())
    }
}
