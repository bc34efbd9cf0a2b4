// ABOUTME: Strategy registry and the deployer that runs one resolved deployment.
// ABOUTME: A strategy picks the slot; the deployer then drives every phase against it.

mod bluegreen;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub use bluegreen::resolve_slot;

use crate::bundle::Bundler;
use crate::config::DeployConfig;
use crate::deploy::{DeployError, DeployReport, DeploySources, run_phases};
use crate::output::Output;
use crate::secrets::SecretSource;
use crate::target::Transport;
use crate::types::DeployId;

/// Requested strategy name has no implementation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("strategy ({0}) not supported")]
pub struct UnsupportedStrategy(pub String);

/// How the next slot is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Alternate between `blue` and `green` based on what the target reports as live.
    #[default]
    BlueGreen,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::BlueGreen => "bluegreen",
        }
    }

    /// Ask the target which slot the next run should deploy to.
    pub async fn next_id<T: Transport + ?Sized>(&self, target: &T) -> Result<DeployId, DeployError> {
        match self {
            Strategy::BlueGreen => Ok(DeployId::from(resolve_slot(target).await?)),
        }
    }
}

impl FromStr for Strategy {
    type Err = UnsupportedStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bluegreen" => Ok(Strategy::BlueGreen),
            other => Err(UnsupportedStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to run a deployment, reusable across watch-mode runs.
pub struct Deployer<T, B> {
    strategy: Strategy,
    target: T,
    bundler: B,
    func_dir: PathBuf,
    static_dir: Option<PathBuf>,
    secrets: SecretSource,
    output: Output,
}

impl<T: Transport, B: Bundler> Deployer<T, B> {
    pub fn new(target: T, bundler: B, config: &DeployConfig, output: Output) -> Self {
        Self {
            strategy: config.strategy,
            target,
            bundler,
            func_dir: config.func_dir.clone(),
            static_dir: config.static_dir.clone(),
            secrets: SecretSource::default(),
            output,
        }
    }

    /// Replace the environment as the source of secrets.
    pub fn with_secrets(mut self, secrets: SecretSource) -> Self {
        self.secrets = secrets;
        self
    }

    /// Resolve the next slot and run every phase against it.
    ///
    /// Secrets are collected fresh on each call, so a watch-mode run picks
    /// up variables exported since the previous one.
    pub async fn deploy(&self) -> Result<DeployReport, DeployError> {
        let id = self.strategy.next_id(&self.target).await?;
        self.output.tagged("deploy", &format!("deploying to {id}"));

        let sources = DeploySources {
            func_dir: self.func_dir.clone(),
            static_dir: self.static_dir.clone(),
            secrets: self.secrets.collect(),
        };

        run_phases(id, &sources, &self.target, &self.bundler, &self.output).await
    }
}
