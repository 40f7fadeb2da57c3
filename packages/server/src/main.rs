//! `mutalyzer-ld`: serves Mutalyzer results as JSON or Turtle.
//!
//! # Quick start
//!
//! ```sh
//! # Against the public service on the default port:
//! mutalyzer-ld
//!
//! # Custom bind address and remote endpoint:
//! MUTALYZER_LD_BIND=127.0.0.1:8080 MUTALYZER_LD_REMOTE_URL=http://localhost:5000/json mutalyzer-ld
//! ```
//!
//! # Environment variables
//!
//! See [`mutalyzer_ld_server::ServerConfig::from_env`] for the full list.

use std::sync::Arc;
use std::time::Duration;

use mutalyzer_ld::Pipeline;
use mutalyzer_ld_server::{build_router, AppState, HttpRemote, RemoteService, ServerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "mutalyzer_ld_server=info,mutalyzer_ld=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = ServerConfig::from_env();

    // Templates compile here or not at all.
    let pipeline = Pipeline::builtin()
        .unwrap_or_else(|e| panic!("failed to build the template registry: {e}"));

    let remote: Arc<dyn RemoteService> = Arc::new(
        HttpRemote::with_timeout(
            config.remote_url.clone(),
            Duration::from_secs(config.remote_timeout_secs),
        )
        .expect("failed to build HTTP client for the remote service"),
    );
    tracing::info!(
        "remote service: {} (timeout = {}s)",
        config.remote_url,
        config.remote_timeout_secs
    );

    let app = build_router(AppState {
        remote,
        pipeline,
        config: config.clone(),
    });

    tracing::info!("listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    axum::serve(listener, app)
        .await
        .expect("server error");
}
