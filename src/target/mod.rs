// ABOUTME: Client side of the deployment target's HTTP API.
// ABOUTME: Exposes the endpoint map, the Transport trait, and the hyper-backed transport.

mod endpoint;
mod error;
mod transport;

pub use endpoint::Endpoint;
pub use error::TransportError;
pub use transport::{
    ACCEPTED, API_KEY_HEADER, API_SECRET_KEY_HEADER, HttpTransport, TargetResponse, Transport,
};
