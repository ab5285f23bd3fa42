//! HTTP Server Configuration
//!
//! Configuration for the HTTP server including host, port, CORS and the
//! store call timeout.

use std::time::Duration;

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (default: empty, meaning any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Upper bound on a single request's store work, in milliseconds
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_store_timeout_ms() -> u64 {
    5000
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            store_timeout_ms: default_store_timeout_ms(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Configured origins as header values; fails on the first entry that
    /// cannot be sent in a header
    pub fn cors_header_values(&self) -> Result<Vec<HeaderValue>, String> {
        self.cors_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|_| format!("invalid origin '{}'", origin))
            })
            .collect()
    }
}
