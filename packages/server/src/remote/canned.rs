//! Fixed-result remote service.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use mutalyzer_ld::RequestParams;
use serde_json::Value;

use super::{RemoteError, RemoteService};

/// Returns a preset raw result per operation and records every call.
#[derive(Default)]
pub struct CannedRemote {
    results: HashMap<String, Value>,
    calls: RwLock<Vec<(String, RequestParams)>>,
}

impl CannedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `operation` with `result` from now on.
    pub fn with(mut self, operation: impl Into<String>, result: Value) -> Self {
        self.results.insert(operation.into(), result);
        self
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<(String, RequestParams)> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RemoteService for CannedRemote {
    async fn call(&self, operation: &str, params: &RequestParams) -> Result<Value, RemoteError> {
        if let Ok(mut calls) = self.calls.write() {
            calls.push((operation.to_string(), params.clone()));
        }
        self.results
            .get(operation)
            .cloned()
            .ok_or_else(|| RemoteError::Unavailable(operation.to_string()))
    }
}
