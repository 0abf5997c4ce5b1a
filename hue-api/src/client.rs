use std::collections::BTreeMap;

use async_trait::async_trait;
use hue_client::{ClientConfig, HueHttpClient};
use parking_lot::RwLock;
use serde_json::Value;

use crate::error::error_codes;
use crate::models::light::RawLight;
use crate::models::user::WhitelistEntry;
use crate::{ApiError, Light, NewUser, Result, User};

/// Operations the addon needs from a Hue bridge
///
/// [`HueBridge`] implements this over HTTP. The trait exists so that the
/// pairing flow and the variables built on top of it can run against any
/// bridge implementation, including in-memory ones in tests.
#[async_trait]
pub trait BridgeClient: Send + Sync {
    /// Host name or IP address of the bridge
    fn host(&self) -> &str;

    /// Credential currently used for authenticated calls
    fn username(&self) -> Option<String>;

    /// Switch to a different credential, e.g. after [`create_user`](Self::create_user)
    fn set_username(&self, username: String);

    /// Whether the current credential is whitelisted on the bridge
    ///
    /// A missing or unknown credential yields `Ok(false)`; only transport
    /// and parse failures are reported as errors.
    async fn is_authenticated(&self) -> Result<bool>;

    /// Whitelist entry of the current credential
    async fn current_user(&self) -> Result<User>;

    /// Register a new credential
    ///
    /// Fails with bridge error 101 unless the link button was pressed
    /// within the last 30 seconds. The client keeps using its current
    /// credential until [`set_username`](Self::set_username) is called.
    async fn create_user(&self, new_user: &NewUser) -> Result<User>;

    /// All lights known to the bridge, ordered by bridge id
    async fn lights(&self) -> Result<Vec<Light>>;

    /// A single light by bridge id
    async fn light(&self, id: &str) -> Result<Light>;

    /// Write the light's name and writable state back to the bridge
    async fn save_light(&self, light: &Light) -> Result<()>;

    /// Write the parts of `updated` that differ from `previous`
    ///
    /// The update is checked with [`Light::check_update`] first; nothing is
    /// sent when it is refused.
    async fn update_light(&self, previous: &Light, updated: &Light) -> Result<()>;
}

/// HTTP implementation of [`BridgeClient`]
#[derive(Debug)]
pub struct HueBridge {
    host: String,
    http: HueHttpClient,
    username: RwLock<Option<String>>,
}

impl HueBridge {
    /// Create a bridge client with default configuration
    pub fn new(host: &str, username: Option<String>) -> Result<Self> {
        Self::with_config(host, username, &ClientConfig::default())
    }

    /// Create a bridge client with custom connection settings
    pub fn with_config(host: &str, username: Option<String>, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            host: host.to_string(),
            http: HueHttpClient::new(host, config)?,
            username: RwLock::new(username),
        })
    }

    fn authenticated_path(&self, suffix: &str) -> Result<String> {
        let username = self.username.read().clone().ok_or(ApiError::NotAuthenticated)?;
        Ok(format!("/{}{}", username, suffix))
    }

    async fn config(&self) -> Result<Value> {
        let path = self.authenticated_path("/config")?;
        Ok(self.http.get(&path).await?)
    }
}

#[async_trait]
impl BridgeClient for HueBridge {
    fn host(&self) -> &str {
        &self.host
    }

    fn username(&self) -> Option<String> {
        self.username.read().clone()
    }

    fn set_username(&self, username: String) {
        *self.username.write() = Some(username);
    }

    async fn is_authenticated(&self) -> Result<bool> {
        if self.username.read().is_none() {
            return Ok(false);
        }

        match self.config().await {
            // The bridge answers /config for anyone, but only includes the
            // whitelist when the credential is valid
            Ok(config) => Ok(config.get("whitelist").is_some()),
            Err(e) if e.bridge_code() == Some(error_codes::UNAUTHORIZED_USER) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn current_user(&self) -> Result<User> {
        let username = self.username().ok_or(ApiError::NotAuthenticated)?;
        let mut config = self.config().await?;

        let entry = config
            .get_mut("whitelist")
            .and_then(|whitelist| whitelist.get_mut(&username))
            .map(Value::take)
            .ok_or(ApiError::NotAuthenticated)?;

        let entry: WhitelistEntry = serde_json::from_value(entry)?;
        Ok(User::from_whitelist_entry(&username, entry))
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User> {
        let response = self.http.post("", &new_user.body()).await?;

        let username = response
            .get(0)
            .and_then(|entry| entry.pointer("/success/username"))
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::ParseError("Missing username in user creation response".to_string()))?;

        tracing::info!("Bridge {} issued a new credential", self.host);
        Ok(User::issued(username, new_user.device_type()))
    }

    async fn lights(&self) -> Result<Vec<Light>> {
        let path = self.authenticated_path("/lights")?;
        let response = self.http.get(&path).await?;

        let raw: BTreeMap<String, RawLight> = serde_json::from_value(response)?;
        let mut lights: Vec<Light> = raw
            .into_iter()
            .map(|(id, raw)| Light::from_raw(id, raw))
            .collect();

        // Bridge ids are numeric strings; "10" sorts after "9"
        lights.sort_by(|a, b| {
            a.id.parse::<u32>()
                .ok()
                .cmp(&b.id.parse::<u32>().ok())
                .then_with(|| a.id.cmp(&b.id))
        });

        tracing::debug!("Bridge {} reported {} lights", self.host, lights.len());
        Ok(lights)
    }

    async fn light(&self, id: &str) -> Result<Light> {
        let path = self.authenticated_path(&format!("/lights/{}", id))?;
        let response = self.http.get(&path).await?;

        let raw: RawLight = serde_json::from_value(response)?;
        Ok(Light::from_raw(id.to_string(), raw))
    }

    async fn save_light(&self, light: &Light) -> Result<()> {
        let base = self.authenticated_path(&format!("/lights/{}", light.id))?;

        self.http.put(&base, &light.attribute_update()).await?;
        self.http
            .put(&format!("{}/state", base), &light.state_update())
            .await?;

        tracing::debug!("Saved light {} ({})", light.id, light.name);
        Ok(())
    }

    async fn update_light(&self, previous: &Light, updated: &Light) -> Result<()> {
        previous.check_update(updated)?;
        let base = self.authenticated_path(&format!("/lights/{}", updated.id))?;

        if previous.attributes_changed(updated) {
            self.http.put(&base, &updated.attribute_update()).await?;
        }
        if previous.state_changed(updated) {
            self.http
                .put(&format!("{}/state", base), &updated.state_update())
                .await?;
        }

        tracing::debug!("Updated light {} ({})", updated.id, updated.name);
        Ok(())
    }
}
