//! Whitelisted bridge users
//!
//! A "user" is what the bridge calls a credential: the generated `username`
//! doubles as the API key in every authenticated URL.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::{ApiError, Result};

/// Longest `devicetype` the bridge accepts
pub const MAX_DEVICE_TYPE_LEN: usize = 40;

/// A credential known to the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub device_type: Option<String>,
    pub created: Option<String>,
    pub last_used: Option<String>,
}

impl User {
    /// A freshly issued credential; the bridge returns nothing but the username
    pub fn issued(username: impl Into<String>, device_type: &str) -> Self {
        Self {
            username: username.into(),
            device_type: Some(device_type.to_string()),
            created: None,
            last_used: None,
        }
    }

    pub(crate) fn from_whitelist_entry(username: &str, entry: WhitelistEntry) -> Self {
        Self {
            username: username.to_string(),
            device_type: entry.name,
            created: entry.create_date,
            last_used: entry.last_use_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WhitelistEntry {
    name: Option<String>,
    #[serde(rename = "create date")]
    create_date: Option<String>,
    #[serde(rename = "last use date")]
    last_use_date: Option<String>,
}

/// Request to register a new credential with the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    device_type: String,
}

impl NewUser {
    /// Create a registration request for `device_type`
    ///
    /// The bridge stores the device type as the whitelist entry name and
    /// rejects anything empty or longer than [`MAX_DEVICE_TYPE_LEN`].
    pub fn new(device_type: impl Into<String>) -> Result<Self> {
        let device_type = device_type.into();
        if device_type.is_empty() || device_type.len() > MAX_DEVICE_TYPE_LEN {
            return Err(ApiError::InvalidParameter(format!(
                "device type must be 1 to {} characters, got {}",
                MAX_DEVICE_TYPE_LEN,
                device_type.len()
            )));
        }
        Ok(Self { device_type })
    }

    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    /// Body for `POST /api`
    pub fn body(&self) -> Value {
        json!({ "devicetype": self.device_type })
    }
}
