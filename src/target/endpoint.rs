// ABOUTME: The HTTP surface the target exposes for deployments.
// ABOUTME: Maps each call to its method and path under the base URL.

use hyper::Method;

use crate::types::DeployId;

/// A single call the deployer can make against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `GET /deploy`: plain-text name of the live slot.
    CurrentSlot,
    Begin(&'a DeployId),
    Secret(&'a DeployId, &'a str),
    Function(&'a DeployId),
    /// Relative, slash-separated path of a static asset.
    Static(&'a DeployId, &'a str),
    Activate(&'a DeployId),
}

impl Endpoint<'_> {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::CurrentSlot => Method::GET,
            Endpoint::Begin(_) | Endpoint::Activate(_) => Method::POST,
            Endpoint::Secret(..) | Endpoint::Function(_) | Endpoint::Static(..) => Method::PUT,
        }
    }

    /// Path relative to the target's base URL, with user-supplied segments escaped.
    pub fn path(&self) -> String {
        match self {
            Endpoint::CurrentSlot => "/deploy".to_string(),
            Endpoint::Begin(id) => format!("/deploy/{id}/begin"),
            Endpoint::Secret(id, key) => {
                format!("/deploy/{id}/secret/{}", urlencoding::encode(key))
            }
            Endpoint::Function(id) => format!("/deploy/{id}/function"),
            Endpoint::Static(id, path) => {
                let encoded: Vec<_> = path
                    .split('/')
                    .map(|segment| urlencoding::encode(segment).into_owned())
                    .collect();
                format!("/deploy/{id}/static/{}", encoded.join("/"))
            }
            Endpoint::Activate(id) => format!("/deploy/{id}/activate"),
        }
    }
}
