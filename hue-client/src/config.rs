//! Connection settings for the bridge HTTP client

use std::time::Duration;

/// Configuration for [`HueHttpClient`](crate::HueHttpClient)
///
/// The bridge host itself is not part of the configuration; it is supplied
/// per client because every addon instance points at its own bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Port the bridge API listens on
    /// Default: 80
    pub port: u16,

    /// Upper bound for a whole request, including reading the body
    /// Default: 15 seconds
    pub request_timeout: Duration,

    /// Upper bound for establishing the TCP connection
    /// Default: 5 seconds
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            port: 80,
            request_timeout: Duration::from_secs(15),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bridge API port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the overall request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Base URL of the bridge API for the given host
    pub fn base_url(&self, host: &str) -> String {
        format!("http://{}:{}/api", host, self.port)
    }
}
