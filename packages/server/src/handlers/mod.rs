//! HTTP request handlers for the operation endpoints.
//!
//! Handlers are thin: they pick and check the query parameters, negotiate
//! the representation, call the remote service and hand the raw result to
//! the [`Pipeline`]. Every conversion decision lives in the core crate.

pub mod operations;

use std::sync::Arc;

use mutalyzer_ld::Pipeline;

use crate::{config::ServerConfig, remote::RemoteService};

/// Shared application state threaded through all Axum handlers via [`axum::extract::State`].
#[derive(Clone)]
pub struct AppState {
    pub remote: Arc<dyn RemoteService>,
    /// Holds the template registry compiled at startup; read-only afterwards.
    pub pipeline: Pipeline,
    pub config: ServerConfig,
}
