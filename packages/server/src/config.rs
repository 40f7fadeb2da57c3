//! Server configuration, populated from environment variables.

use std::net::SocketAddr;

/// Runtime configuration for the front end.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `MUTALYZER_LD_BIND` | `0.0.0.0:3000` | TCP socket address to listen on |
/// | `MUTALYZER_LD_REMOTE_URL` | `https://mutalyzer.nl/json` | Base URL of the remote service |
/// | `MUTALYZER_LD_REMOTE_TIMEOUT_SECS` | `30` | Timeout for one remote call |
/// | `MUTALYZER_LD_LOG_ERRORS` | `true` | Log every error response |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,

    /// Base URL of the remote service; operations are appended as path segments.
    pub remote_url: String,

    pub remote_timeout_secs: u64,

    /// Whether error responses are logged before they are sent.
    pub log_errors: bool,
}

impl ServerConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Self {
        let bind_addr: SocketAddr = std::env::var("MUTALYZER_LD_BIND")
            .unwrap_or_else(|_| "0.0.0.0:3000".into())
            .parse()
            .expect("MUTALYZER_LD_BIND must be a valid socket address (e.g. 0.0.0.0:3000)");

        let remote_timeout_secs = std::env::var("MUTALYZER_LD_REMOTE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let log_errors = std::env::var("MUTALYZER_LD_LOG_ERRORS")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        Self {
            bind_addr,
            remote_url: std::env::var("MUTALYZER_LD_REMOTE_URL")
                .unwrap_or_else(|_| "https://mutalyzer.nl/json".into()),
            remote_timeout_secs,
            log_errors,
        }
    }
}
