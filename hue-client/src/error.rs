//! Error types for the bridge HTTP client

use thiserror::Error;

/// Errors that can occur while talking to a Hue bridge
#[derive(Debug, Error)]
pub enum HueError {
    /// Network or HTTP communication error
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Parse(String),

    /// Error entry returned by the bridge inside an otherwise successful response
    #[error("Bridge error {code} at {address}: {description}")]
    Bridge {
        code: u16,
        address: String,
        description: String,
    },
}
