// ABOUTME: Secrets delivered to the target, taken from prefixed environment variables.
// ABOUTME: ATROCITY_PG_URL is delivered as PG_URL; collected fresh for every run.

use std::collections::BTreeMap;
use std::ffi::OsString;

/// Environment variable prefix that marks a variable as a secret to deploy.
pub const SECRET_PREFIX: &str = "ATROCITY_";

/// One secret, keyed by its name with the prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretEntry {
    pub key: String,
    pub value: String,
}

/// The set of secrets for one deployment run, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    entries: BTreeMap<String, String>,
}

impl Secrets {
    /// Collect variables carrying `prefix` from `vars`.
    ///
    /// Variables that are not valid UTF-8, or whose name is exactly the
    /// prefix, are skipped with a warning.
    pub fn from_vars<I>(prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let mut entries = BTreeMap::new();

        for (name, value) in vars {
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(key) = name.strip_prefix(prefix) else {
                continue;
            };
            if key.is_empty() {
                tracing::warn!("ignoring variable {name}: empty secret name");
                continue;
            }
            match value.into_string() {
                Ok(value) => {
                    entries.insert(key.to_string(), value);
                }
                Err(_) => tracing::warn!("ignoring secret {key}: value is not valid UTF-8"),
            }
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = SecretEntry> + '_ {
        self.entries.iter().map(|(key, value)| SecretEntry {
            key: key.clone(),
            value: value.clone(),
        })
    }
}

impl FromIterator<(String, String)> for Secrets {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Where a run gets its secrets from.
#[derive(Debug, Clone)]
pub enum SecretSource {
    /// Read the process environment at the start of every run.
    Environment { prefix: String },
    /// A fixed set, used when the caller already knows the secrets.
    Fixed(Secrets),
}

impl Default for SecretSource {
    fn default() -> Self {
        SecretSource::Environment {
            prefix: SECRET_PREFIX.to_string(),
        }
    }
}

impl SecretSource {
    pub fn collect(&self) -> Secrets {
        match self {
            SecretSource::Environment { prefix } => Secrets::from_vars(prefix, std::env::vars_os()),
            SecretSource::Fixed(secrets) => secrets.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(OsString, OsString)> {
        pairs
            .iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(v)))
            .collect()
    }

    #[test]
    fn strips_prefix_and_ignores_other_variables() {
        let secrets = Secrets::from_vars(
            SECRET_PREFIX,
            vars(&[
                ("ATROCITY_PG_CONNECTION", "postgres://db"),
                ("HOME", "/root"),
                ("ATROCITY_TOKEN", "t0k"),
                ("NOT_ATROCITY_X", "x"),
            ]),
        );

        let entries: Vec<_> = secrets.iter().collect();
        assert_eq!(
            entries,
            vec![
                SecretEntry {
                    key: "PG_CONNECTION".to_string(),
                    value: "postgres://db".to_string()
                },
                SecretEntry {
                    key: "TOKEN".to_string(),
                    value: "t0k".to_string()
                },
            ]
        );
    }

    #[test]
    fn bare_prefix_is_skipped() {
        let secrets = Secrets::from_vars(SECRET_PREFIX, vars(&[("ATROCITY_", "v")]));
        assert!(secrets.is_empty());
    }

    #[test]
    fn empty_values_are_still_delivered() {
        let secrets = Secrets::from_vars(SECRET_PREFIX, vars(&[("ATROCITY_EMPTY", "")]));
        assert_eq!(secrets.len(), 1);
    }

    #[test]
    fn environment_source_reads_fresh_values() {
        let source = SecretSource::default();
        temp_env::with_var("ATROCITY_ATROCTL_TEST_SECRET", Some("one"), || {
            let secrets = source.collect();
            assert!(secrets.iter().any(|e| e.key == "ATROCTL_TEST_SECRET" && e.value == "one"));
        });
        temp_env::with_var("ATROCITY_ATROCTL_TEST_SECRET", Some("two"), || {
            let secrets = source.collect();
            assert!(secrets.iter().any(|e| e.key == "ATROCTL_TEST_SECRET" && e.value == "two"));
        });
    }

    #[test]
    fn fixed_source_returns_its_secrets() {
        let fixed: Secrets = [("A".to_string(), "1".to_string())].into_iter().collect();
        let source = SecretSource::Fixed(fixed.clone());
        assert_eq!(source.collect(), fixed);
    }
}
