// ABOUTME: Target connection settings: base URL, credentials, and call timeout.
// ABOUTME: Built once at startup and shared read-only with the transport.

use hyper::Uri;
use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default target when nothing else is configured.
pub const DEFAULT_URL: &str = "http://localhost:9090";

/// Validated `http://` or `https://` base URL of the target, optionally with a path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    raw: String,
    tls: bool,
    authority: String,
    host: String,
    port: u16,
    prefix: String,
}

impl BaseUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidUrl {
            url: raw.to_string(),
            reason,
        };

        let uri: Uri = raw.trim().parse().map_err(|e| invalid(format!("{e}")))?;

        let tls = match uri.scheme_str() {
            Some("http") => false,
            Some("https") => true,
            Some(other) => {
                return Err(invalid(format!(
                    "unsupported scheme '{other}' (expected http or https)"
                )));
            }
            None => return Err(invalid("missing scheme".to_string())),
        };

        if uri.query().is_some() {
            return Err(invalid("query strings are not allowed".to_string()));
        }

        let authority = uri
            .authority()
            .ok_or_else(|| invalid("missing host".to_string()))?;

        let host = authority
            .host()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();

        Ok(Self {
            raw: raw.trim().trim_end_matches('/').to_string(),
            tls,
            authority: authority.as_str().to_string(),
            host,
            port: authority
                .port_u16()
                .unwrap_or(if tls { 443 } else { 80 }),
            prefix: uri.path().trim_end_matches('/').to_string(),
        })
    }

    /// Whether calls go over TLS (`https://`).
    pub fn is_tls(&self) -> bool {
        self.tls
    }

    /// `host[:port]` exactly as configured, used for the `Host` header.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Request target for an endpoint path, keeping any configured path prefix.
    pub fn path_for(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path)
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Static credential headers. Empty values count as not configured.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    api_key: Option<String>,
    api_secret: Option<String>,
}

impl Credentials {
    pub fn new(api_key: Option<String>, api_secret: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|v| !v.is_empty()),
            api_secret: api_secret.filter(|v| !v.is_empty()),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Everything the transport needs to reach the target.
#[derive(Debug, Clone)]
pub struct TargetConfig {
    pub base_url: BaseUrl,
    pub credentials: Credentials,
    /// Upper bound for a single call, including connect. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl TargetConfig {
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            credentials: Credentials::default(),
            timeout: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_url() {
        let url = BaseUrl::parse(DEFAULT_URL).unwrap();
        assert_eq!(url.host(), "localhost");
        assert_eq!(url.port(), 9090);
        assert_eq!(url.authority(), "localhost:9090");
        assert_eq!(url.path_for("/deploy"), "/deploy");
        assert_eq!(url.to_string(), "http://localhost:9090");
    }

    #[test]
    fn port_defaults_to_80() {
        let url = BaseUrl::parse("http://example.com").unwrap();
        assert_eq!(url.port(), 80);
        assert!(!url.is_tls());
    }

    #[test]
    fn https_uses_tls_and_port_443() {
        let url = BaseUrl::parse("https://example.com").unwrap();
        assert!(url.is_tls());
        assert_eq!(url.port(), 443);
        assert_eq!(url.host(), "example.com");
        assert_eq!(url.to_string(), "https://example.com");

        let url = BaseUrl::parse("https://example.com:8443/api").unwrap();
        assert_eq!(url.port(), 8443);
        assert_eq!(url.path_for("/deploy"), "/api/deploy");
    }

    #[test]
    fn path_prefix_is_preserved() {
        let url = BaseUrl::parse("http://example.com/atrocity/").unwrap();
        assert_eq!(url.path_for("/deploy"), "/atrocity/deploy");
        assert_eq!(url.to_string(), "http://example.com/atrocity");
    }

    #[test]
    fn ipv6_host_is_unbracketed() {
        let url = BaseUrl::parse("http://[::1]:9090").unwrap();
        assert_eq!(url.host(), "::1");
        assert_eq!(url.authority(), "[::1]:9090");
    }

    #[test]
    fn rejects_other_schemes_and_queries() {
        assert!(matches!(
            BaseUrl::parse("ftp://example.com"),
            Err(Error::InvalidUrl { .. })
        ));
        assert!(BaseUrl::parse("example.com").is_err());
        assert!(BaseUrl::parse("http://example.com/?a=b").is_err());
    }

    #[test]
    fn empty_credentials_are_not_configured() {
        let creds = Credentials::new(Some(String::new()), Some("s3cret".to_string()));
        assert_eq!(creds.api_key(), None);
        assert_eq!(creds.api_secret(), Some("s3cret"));
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let creds = Credentials::new(Some("key".to_string()), None);
        let debug = format!("{creds:?}");
        assert!(!debug.contains("key\""));
        assert!(debug.contains("<redacted>"));
    }
}
