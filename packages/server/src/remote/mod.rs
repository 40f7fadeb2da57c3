//! Remote-call abstraction for the sequence-annotation service.
//!
//! The [`RemoteService`] trait is the only seam between the HTTP layer and
//! the outside world. Handlers pass the operation name and the picked
//! parameters; implementations return the raw, still wrapped result.
//!
//! # Implementations
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`HttpRemote`] | Production; calls the service over HTTP |
//! | `canned::CannedRemote` | Unit tests only; returns fixed results |
//!
//! [`HttpRemote`]: http::HttpRemote

#[cfg(test)]
pub mod canned;
pub mod http;

use async_trait::async_trait;
use mutalyzer_ld::RequestParams;
use serde_json::Value;

/// Errors from the transport, before any result normalization.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The HTTP request or response failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-2xx HTTP status code.
    #[error("remote service returned status {0}")]
    BadStatus(u16),

    /// No result is available for the operation.
    #[error("no result for operation {0:?}")]
    Unavailable(String),
}

/// A client for the remote service.
#[async_trait]
pub trait RemoteService: Send + Sync + 'static {
    /// Invoke `operation` with `params` and return the raw result.
    async fn call(&self, operation: &str, params: &RequestParams) -> Result<Value, RemoteError>;
}
