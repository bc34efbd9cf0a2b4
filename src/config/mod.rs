// ABOUTME: Configuration types and layered resolution for atroctl.
// ABOUTME: Precedence is flag, then environment, then atroctl.yml, then built-in defaults.

mod env_value;
mod file;
mod init;
mod target;

pub use env_value::EnvValue;
pub use file::{CONFIG_FILENAME, CONFIG_FILENAME_ALT, CONFIG_FILENAME_DIR, ProjectConfig};
pub use init::init_config;
pub use target::{BaseUrl, Credentials, DEFAULT_URL, TargetConfig};

use std::path::PathBuf;
use std::time::Duration;

use crate::error::Result;
use crate::strategy::Strategy;

pub const DEFAULT_FUNC_DIR: &str = "src";
pub const DEFAULT_STRATEGY: &str = "bluegreen";
pub const DEFAULT_ESBUILD: &str = "esbuild";

/// Values given as flags or environment variables. clap has already applied
/// flag-over-environment precedence when these are filled in.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub timeout: Option<Duration>,
    pub func_dir: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub strategy: Option<String>,
    pub watch: bool,
    pub esbuild: Option<PathBuf>,
}

/// What to deploy and how.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub func_dir: PathBuf,
    pub static_dir: Option<PathBuf>,
    pub strategy: Strategy,
    pub watch: bool,
    pub esbuild: PathBuf,
}

/// Fully resolved, immutable settings for one process.
#[derive(Debug, Clone)]
pub struct Settings {
    pub target: TargetConfig,
    pub deploy: DeployConfig,
}

impl Settings {
    /// Merge overrides with an optional project file and defaults.
    ///
    /// Fails on an unsupported strategy or an invalid URL, before anything
    /// touches the network.
    pub fn resolve(overrides: Overrides, file: Option<ProjectConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let url = non_empty(overrides.url)
            .or(file.url)
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        let base_url = BaseUrl::parse(&url)?;

        let api_key = match non_empty(overrides.api_key) {
            Some(key) => Some(key),
            None => file.api_key.as_ref().map(EnvValue::resolve).transpose()?,
        };
        let api_secret = match non_empty(overrides.api_secret) {
            Some(secret) => Some(secret),
            None => file.api_secret.as_ref().map(EnvValue::resolve).transpose()?,
        };

        let strategy_name = non_empty(overrides.strategy)
            .or(file.strategy)
            .unwrap_or_else(|| DEFAULT_STRATEGY.to_string());
        let strategy: Strategy = strategy_name.parse()?;

        let target = TargetConfig::new(base_url)
            .with_credentials(Credentials::new(api_key, api_secret))
            .with_timeout(overrides.timeout.or(file.timeout));

        let deploy = DeployConfig {
            func_dir: non_empty_path(overrides.func_dir)
                .or(file.func_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FUNC_DIR)),
            static_dir: non_empty_path(overrides.static_dir)
                .or_else(|| non_empty_path(file.static_dir)),
            strategy,
            watch: overrides.watch || file.watch.unwrap_or(false),
            esbuild: non_empty_path(overrides.esbuild)
                .or(file.esbuild)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ESBUILD)),
        };

        Ok(Self { target, deploy })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn non_empty_path(value: Option<PathBuf>) -> Option<PathBuf> {
    value.filter(|p| !p.as_os_str().is_empty())
}
