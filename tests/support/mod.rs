// ABOUTME: Test support utilities.
// ABOUTME: Provides a wiremock-backed target, a fixed bundler, and project directory helpers.

use std::path::Path;
use std::sync::Once;

use async_trait::async_trait;
use atroctl::bundle::{BundleError, Bundler};
use atroctl::config::{BaseUrl, Credentials, TargetConfig};
use atroctl::target::HttpTransport;
use bytes::Bytes;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("atroctl=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Start a target that reports `current` as the live slot and accepts every phase call.
#[allow(dead_code)]
pub async fn target_reporting(current: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/deploy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(current))
        .mount(&server)
        .await;
    server
}

/// Accept every remaining POST and PUT with 204. Mount after any failing mocks.
#[allow(dead_code)]
pub async fn accept_everything(server: &MockServer) {
    for verb in ["POST", "PUT"] {
        Mock::given(method(verb))
            .respond_with(ResponseTemplate::new(204))
            .mount(server)
            .await;
    }
}

/// Transport pointed at `server` with the given credentials.
#[allow(dead_code)]
pub fn transport(server: &MockServer, key: Option<&str>, secret: Option<&str>) -> HttpTransport {
    let base = BaseUrl::parse(&server.uri()).unwrap();
    HttpTransport::new(TargetConfig::new(base).with_credentials(Credentials::new(
        key.map(str::to_string),
        secret.map(str::to_string),
    )))
}

/// Method and path of every request the server saw, in arrival order.
#[allow(dead_code)]
pub async fn calls(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect()
}

/// Bundler returning fixed output without spawning anything.
#[allow(dead_code)]
pub struct FixedBundler(pub &'static str);

#[async_trait]
impl Bundler for FixedBundler {
    async fn bundle(&self, _source_dir: &Path) -> Result<Bytes, BundleError> {
        Ok(Bytes::from_static(self.0.as_bytes()))
    }
}

/// A function directory with an entry file.
#[allow(dead_code)]
pub fn function_dir(root: &Path) -> std::path::PathBuf {
    let dir = root.join("src");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.js"), "export default () => 'hi';\n").unwrap();
    dir
}
