use std::sync::Arc;

use hue_client::ClientConfig;

use crate::{BridgeClient, HueBridge, Result};

/// Builds bridge clients from a host and an optional credential
///
/// The addon only learns the bridge address when an instance is created, so
/// it holds a connector rather than a client.
pub trait BridgeConnector: Send + Sync {
    fn connect(&self, host: &str, username: Option<String>) -> Result<Arc<dyn BridgeClient>>;
}

/// Connector producing [`HueBridge`] HTTP clients
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    config: ClientConfig,
}

impl HttpConnector {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl BridgeConnector for HttpConnector {
    fn connect(&self, host: &str, username: Option<String>) -> Result<Arc<dyn BridgeClient>> {
        Ok(Arc::new(HueBridge::with_config(host, username, &self.config)?))
    }
}
