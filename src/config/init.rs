// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Writes a commented atroctl.yml template.

use std::path::Path;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, DEFAULT_FUNC_DIR, DEFAULT_STRATEGY, DEFAULT_URL};

pub fn init_config(dir: &Path, url: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    // Validate before writing so a bad URL never lands in the file.
    let url = match url {
        Some(u) => super::BaseUrl::parse(u)?.to_string(),
        None => DEFAULT_URL.to_string(),
    };

    std::fs::write(&config_path, template_yaml(&url))?;

    Ok(())
}

fn template_yaml(url: &str) -> String {
    format!(
        r#"url: {url}
func_dir: {DEFAULT_FUNC_DIR}
# static_dir: public
strategy: {DEFAULT_STRATEGY}
# Credentials may be literals or read from the environment:
# api_key:
#   env: ATROCTL_API_KEY
# api_secret:
#   env: ATROCTL_API_SECRET_KEY
# timeout: 30s
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;

    #[test]
    fn template_round_trips_through_parser() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), Some("http://example.com:8080"), false).unwrap();

        let config = ProjectConfig::discover(dir.path()).unwrap().unwrap();
        assert_eq!(config.url.as_deref(), Some("http://example.com:8080"));
        assert_eq!(config.strategy.as_deref(), Some("bluegreen"));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "url: x\n").unwrap();

        assert!(matches!(
            init_config(dir.path(), None, false),
            Err(Error::AlreadyExists(_))
        ));
        assert!(init_config(dir.path(), None, true).is_ok());
    }

    #[test]
    fn rejects_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        assert!(init_config(dir.path(), Some("ftp://nope"), false).is_err());
        assert!(!dir.path().join(CONFIG_FILENAME).exists());
    }
}
