//! HTTP transport for the remote service.

use std::time::Duration;

use async_trait::async_trait;
use mutalyzer_ld::RequestParams;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{RemoteError, RemoteService};

/// Calls `GET {base_url}/{operation}?{params}` and decodes the JSON body.
///
/// Holds a cloneable [`reqwest::Client`], which pools connections internally.
pub struct HttpRemote {
    client: Client,
    base_url: String,
}

impl HttpRemote {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build a client with the given request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client, base_url))
    }

    pub fn url_for(&self, operation: &str) -> String {
        format!("{}/{}", self.base_url, operation)
    }
}

#[async_trait]
impl RemoteService for HttpRemote {
    async fn call(&self, operation: &str, params: &RequestParams) -> Result<Value, RemoteError> {
        let url = self.url_for(operation);
        let query: Vec<(&str, &str)> = params.iter().collect();
        debug!(%url, ?query, "calling remote service");

        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::BadStatus(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}
