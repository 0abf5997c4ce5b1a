//! Private HTTP client for Philips Hue bridge communication
//!
//! This crate provides a minimal JSON client for the bridge REST API rooted
//! at `/api`. The bridge reports failures as `200 OK` responses carrying an
//! array of `{"error": {...}}` entries; those are decoded here so callers
//! only ever see a successful payload or a [`HueError`].

mod config;
mod error;

pub use config::ClientConfig;
pub use error::HueError;

use reqwest::Method;
use serde_json::Value;

/// A minimal JSON client bound to a single bridge
#[derive(Debug, Clone)]
pub struct HueHttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HueHttpClient {
    /// Create a client for the bridge at `host` using the given configuration
    pub fn new(host: &str, config: &ClientConfig) -> Result<Self, HueError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| HueError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url(host),
        })
    }

    /// Base URL every request path is appended to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a GET request for `path` (relative to `/api`)
    pub async fn get(&self, path: &str) -> Result<Value, HueError> {
        self.request(Method::GET, path, None).await
    }

    /// Send a POST request with a JSON body
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, HueError> {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Send a PUT request with a JSON body
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value, HueError> {
        self.request(Method::PUT, path, Some(body)).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, HueError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, redact_credential(path));

        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HueError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| HueError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(HueError::Network(format!(
                "HTTP {} for {}",
                status.as_u16(),
                redact_credential(path)
            )));
        }

        let value: Value =
            serde_json::from_str(&text).map_err(|e| HueError::Parse(e.to_string()))?;

        extract_response(value)
    }
}

/// Return the payload, or the first error entry the bridge reported
pub fn extract_response(value: Value) -> Result<Value, HueError> {
    if let Value::Array(entries) = &value {
        if let Some(error) = entries.iter().find_map(|entry| entry.get("error")) {
            let code = error
                .get("type")
                .and_then(Value::as_u64)
                .and_then(|c| u16::try_from(c).ok())
                .unwrap_or(0);
            let address = error
                .get("address")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let description = error
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            return Err(HueError::Bridge {
                code,
                address,
                description,
            });
        }
    }

    Ok(value)
}

/// The first path segment is the credential on every authenticated route
fn redact_credential(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }

    match trimmed.split_once('/') {
        Some((_, rest)) => format!("/<credential>/{}", rest),
        None => "/<credential>".to_string(),
    }
}
