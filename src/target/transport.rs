// ABOUTME: Transport seam between the deployer and the target, plus its hyper implementation.
// ABOUTME: Each call opens its own connection (TLS for https targets); there is no pooling and no retry.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::Request;
use hyper::header::{CONTENT_TYPE, HOST};
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use super::endpoint::Endpoint;
use super::error::TransportError;
use crate::config::TargetConfig;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "API_KEY";
/// Header carrying the API secret key.
pub const API_SECRET_KEY_HEADER: &str = "API_SECRET_KEY";

/// Status code the target answers with when it accepts a deployment call.
pub const ACCEPTED: u16 = 204;

/// Status and body returned by the target. Interpreting the status is up to the caller.
#[derive(Debug, Clone)]
pub struct TargetResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TargetResponse {
    /// Whether the target accepted the call (`204 No Content`).
    pub fn is_accepted(&self) -> bool {
        self.status == ACCEPTED
    }

    /// Body decoded as text with surrounding whitespace removed.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).trim().to_string()
    }
}

/// Issues calls against the deployment target.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(
        &self,
        endpoint: Endpoint<'_>,
        content_type: &str,
        body: Bytes,
    ) -> Result<TargetResponse, TransportError>;
}

/// HTTP/1.1 transport over TCP, with TLS for `https://` targets.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: TargetConfig,
    tls: Option<Arc<ClientConfig>>,
}

impl HttpTransport {
    pub fn new(config: TargetConfig) -> Self {
        let tls = config.base_url.is_tls().then(tls_config);
        Self { config, tls }
    }

    async fn send(
        &self,
        endpoint: Endpoint<'_>,
        content_type: &str,
        body: Bytes,
    ) -> Result<TargetResponse, TransportError> {
        let base = &self.config.base_url;
        let addr = base.authority().to_string();

        let mut builder = hyper::Request::builder()
            .method(endpoint.method())
            .uri(base.path_for(&endpoint.path()))
            .header(HOST, &addr)
            .header(CONTENT_TYPE, content_type);

        let credentials = &self.config.credentials;
        if let Some(key) = credentials.api_key() {
            builder = builder.header(API_KEY_HEADER, key);
        }
        if let Some(secret) = credentials.api_secret() {
            builder = builder.header(API_SECRET_KEY_HEADER, secret);
        }

        let req = builder
            .body(Full::new(body))
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let stream = TcpStream::connect((base.host(), base.port()))
            .await
            .map_err(|source| TransportError::Connect {
                addr: addr.clone(),
                source,
            })?;

        match &self.tls {
            Some(tls) => {
                let name = ServerName::try_from(base.host())
                    .map_err(|_| TransportError::InvalidServerName(base.host().to_string()))?
                    .to_owned();
                let stream = TlsConnector::from(Arc::clone(tls))
                    .connect(name, stream)
                    .await
                    .map_err(|source| TransportError::Tls { addr, source })?;
                exchange(TokioIo::new(stream), req).await
            }
            None => exchange(TokioIo::new(stream), req).await,
        }
    }
}

/// Client TLS settings trusting the platform's root certificates.
fn tls_config() -> Arc<ClientConfig> {
    let mut roots = RootCertStore::empty();
    match rustls_native_certs::load_native_certs() {
        Ok(certs) => {
            for cert in certs {
                if let Err(e) = roots.add(cert) {
                    tracing::debug!("skipping unusable root certificate: {e}");
                }
            }
        }
        Err(e) => tracing::warn!("failed to load native root certificates: {e}"),
    }

    Arc::new(
        ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth(),
    )
}

/// Run one request over an established connection and collect the response.
async fn exchange<I>(io: I, req: Request<Full<Bytes>>) -> Result<TargetResponse, TransportError>
where
    I: hyper::rt::Read + hyper::rt::Write + Unpin + Send + 'static,
{
    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(TransportError::Handshake)?;

    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::debug!("target connection error: {}", e);
        }
    });

    let resp = sender
        .send_request(req)
        .await
        .map_err(TransportError::Request)?;

    let status = resp.status().as_u16();
    let body = resp
        .into_body()
        .collect()
        .await
        .map_err(TransportError::Body)?
        .to_bytes();

    Ok(TargetResponse { status, body })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(
        &self,
        endpoint: Endpoint<'_>,
        content_type: &str,
        body: Bytes,
    ) -> Result<TargetResponse, TransportError> {
        let method = endpoint.method();
        let path = endpoint.path();

        let result = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.send(endpoint, content_type, body))
                .await
                .map_err(|_| TransportError::Timeout(limit))?,
            None => self.send(endpoint, content_type, body).await,
        };

        match &result {
            Ok(resp) => tracing::debug!(%method, %path, status = resp.status, "target call"),
            Err(e) => tracing::debug!(%method, %path, error = %e, "target call failed"),
        }

        result
    }
}
