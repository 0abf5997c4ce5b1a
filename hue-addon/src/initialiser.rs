//! Addon entry point and bridge pairing
//!
//! Creating an instance resolves a credential in this order:
//!
//! 1. the `username` input, if the user supplied one;
//! 2. the credential saved by a previous run;
//! 3. a new credential registered with the bridge, which requires the
//!    bridge's link button to have been pressed.
//!
//! A rejected user-supplied credential is fatal. A rejected saved credential
//! is replaced, and the replacement is handed to the host's save callback.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use hue_api::{BridgeClient, BridgeConnector, ClientConfig, HttpConnector, NewUser};
use serde_json::Value;

use crate::addon::HueAddon;
use crate::host::{
    Addon, AddonInitialiser, AddonMetadata, InitialiserMetadata, SaveData, UserInput,
    UserInputKind,
};
use crate::saved_data::SavedData;
use crate::AddonError;

/// Input holding the bridge's address
pub const IP_INPUT: &str = "ip";
/// Optional input holding an existing bridge credential
pub const USERNAME_INPUT: &str = "username";
/// Device type registered with the bridge for new credentials
pub const DEFAULT_DEVICE_TYPE: &str = "consequences-hue";

/// Creates [`HueAddon`] instances for the host
pub struct HueInitialiser {
    metadata: InitialiserMetadata,
    connector: Arc<dyn BridgeConnector>,
    device_type: String,
}

impl HueInitialiser {
    /// Initialiser talking to bridges over HTTP with default settings
    pub fn new() -> Self {
        Self::with_connector(Arc::new(HttpConnector::default()))
    }

    /// Initialiser talking to bridges over HTTP with custom settings
    pub fn with_client_config(config: ClientConfig) -> Self {
        Self::with_connector(Arc::new(HttpConnector::new(config)))
    }

    /// Initialiser using a custom way of reaching bridges
    pub fn with_connector(connector: Arc<dyn BridgeConnector>) -> Self {
        Self {
            metadata: hue_metadata(),
            connector,
            device_type: DEFAULT_DEVICE_TYPE.to_string(),
        }
    }

    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = device_type.into();
        self
    }

    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    /// Pair with the bridge named in `metadata` and return the addon
    pub async fn create_hue_addon(
        &self,
        metadata: AddonMetadata,
        save_data: SaveData,
        saved_data: Option<Value>,
    ) -> Result<HueAddon, AddonError> {
        let host = bridge_host(&metadata)?;
        let supplied = string_input(&metadata, USERNAME_INPUT)?;
        let saved = SavedData::from_saved(saved_data);

        let username = supplied.clone().or_else(|| saved.username.clone());
        let client = self.connector.connect(&host, username)?;

        if verify_credential(client.as_ref()).await? {
            tracing::debug!("Bridge {} accepted the existing credential", host);
            return Ok(HueAddon::new(metadata, client));
        }

        if let Some(supplied) = supplied {
            return Err(AddonError::CredentialRejected(supplied));
        }

        if saved.username.is_some() {
            tracing::warn!(
                "Saved username was not accepted by bridge {}, requesting a new one",
                host
            );
        }

        let new_user = NewUser::new(self.device_type.as_str())?;
        let user = match client.create_user(&new_user).await {
            Ok(user) => user,
            Err(e) if e.is_link_button_not_pressed() => {
                return Err(AddonError::LinkButtonNotPressed)
            }
            Err(e) => return Err(e.into()),
        };

        client.set_username(user.username.clone());
        save_data(SavedData::with_username(user.username).to_value());

        tracing::info!("Paired with bridge {}", host);
        Ok(HueAddon::new(metadata, client))
    }
}

impl Default for HueInitialiser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AddonInitialiser for HueInitialiser {
    fn metadata(&self) -> &InitialiserMetadata {
        &self.metadata
    }

    async fn create_instance(
        &self,
        metadata: AddonMetadata,
        save_data: SaveData,
        saved_data: Option<Value>,
    ) -> Result<Box<dyn Addon>, AddonError> {
        let addon = self.create_hue_addon(metadata, save_data, saved_data).await?;
        Ok(Box::new(addon))
    }
}

fn hue_metadata() -> InitialiserMetadata {
    InitialiserMetadata {
        name: "Philips Hue".to_string(),
        description: "Provides support for the Philip Hue family of devices".to_string(),
        supports_multiple_instances: true,
        inputs: vec![
            UserInput {
                unique_id: IP_INPUT.to_string(),
                name: "Bridge IP Address".to_string(),
                required: true,
                allows_multiple: false,
                kind: UserInputKind::String,
            },
            UserInput {
                unique_id: USERNAME_INPUT.to_string(),
                name: "Bridge Username".to_string(),
                required: false,
                allows_multiple: false,
                kind: UserInputKind::String,
            },
        ],
    }
}

/// Whether the client's credential is whitelisted
///
/// Transport failures are errors rather than `false`: an unreachable bridge
/// would reject a new credential just the same.
async fn verify_credential(client: &dyn BridgeClient) -> Result<bool, AddonError> {
    if !client.is_authenticated().await? {
        return Ok(false);
    }

    match client.current_user().await {
        Ok(_) => Ok(true),
        Err(e) if e.is_unauthorized() => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// A string input, with blank values treated as absent
fn string_input(metadata: &AddonMetadata, unique_id: &str) -> Result<Option<String>, AddonError> {
    match metadata.input(unique_id) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => {
            let value = value.trim();
            Ok((!value.is_empty()).then(|| value.to_string()))
        }
        Some(other) => Err(AddonError::InvalidInput {
            input: unique_id.to_string(),
            reason: format!("expected a string, got {}", other),
        }),
    }
}

/// The bridge address, normalised for use in a URL
fn bridge_host(metadata: &AddonMetadata) -> Result<String, AddonError> {
    let raw = string_input(metadata, IP_INPUT)?
        .ok_or_else(|| AddonError::MissingInput(IP_INPUT.to_string()))?;

    if let Ok(IpAddr::V6(address)) = raw.parse::<IpAddr>() {
        return Ok(format!("[{}]", address));
    }

    url::Host::parse(&raw)
        .map(|host| host.to_string())
        .map_err(|e| AddonError::InvalidInput {
            input: IP_INPUT.to_string(),
            reason: format!("\"{}\" is not a host name or IP address: {}", raw, e),
        })
}
