//! Assembles the Axum [`Router`] from the handler modules.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::{operations, AppState};

/// Build the complete application router with shared state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/runMutalyzer", get(operations::run_mutalyzer))
        .route("/info", get(operations::info))
        .route("/getTranscriptsAndInfo", get(operations::get_transcripts_and_info))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
