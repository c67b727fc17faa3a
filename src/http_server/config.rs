//! Listener settings for the country API
//!
//! The defaults bind to loopback on 8000 and admit the Vite dev server
//! that hosts the country picker front-end.

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

/// Where the API listens and which browser origins may call it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins echoed in `Access-Control-Allow-Origin`. An empty list
    /// admits every origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl HttpServerConfig {
    /// Defaults, listening on `port`.
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// `host:port`, as handed to the listener.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configured origins that a browser could never send: not `http(s)://`
    /// or not a legal header value.
    pub fn invalid_cors_origins(&self) -> Vec<&str> {
        self.cors_origins
            .iter()
            .map(String::as_str)
            .filter(|origin| !is_valid_origin(origin))
            .collect()
    }
}

fn is_valid_origin(origin: &str) -> bool {
    let has_scheme = origin.starts_with("http://") || origin.starts_with("https://");
    has_scheme && HeaderValue::from_str(origin).is_ok()
}
