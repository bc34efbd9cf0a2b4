// ABOUTME: Optional per-project atroctl.yml settings.
// ABOUTME: Sits between environment variables and built-in defaults in precedence.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::EnvValue;
use crate::error::{Error, Result};

pub const CONFIG_FILENAME: &str = "atroctl.yml";
pub const CONFIG_FILENAME_ALT: &str = "atroctl.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".atroctl/config.yml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub api_key: Option<EnvValue>,

    #[serde(default)]
    pub api_secret: Option<EnvValue>,

    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,

    #[serde(default)]
    pub func_dir: Option<PathBuf>,

    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    #[serde(default)]
    pub strategy: Option<String>,

    #[serde(default)]
    pub watch: Option<bool>,

    #[serde(default)]
    pub esbuild: Option<PathBuf>,
}

impl ProjectConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, if any.
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.is_file() {
                tracing::debug!("using project config {}", path.display());
                return Self::load(path).map(Some);
            }
        }

        Ok(None)
    }
}
