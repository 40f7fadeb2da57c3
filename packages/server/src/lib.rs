//! Public surface for the `mutalyzer-ld-server` crate.
//!
//! Exposes the router builder, config and remote-service types so that an
//! in-process server can be started without spawning a subprocess.

pub mod config;
pub mod error;
pub mod handlers;
pub mod remote;
pub mod router;

pub use config::ServerConfig;
pub use handlers::AppState;
pub use remote::{http::HttpRemote, RemoteService};
pub use router::build_router;
