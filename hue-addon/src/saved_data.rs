//! Data the host persists between runs of an addon instance

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Persisted state of a Hue addon instance: the bridge credential
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl SavedData {
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    /// Interpret whatever the host handed back
    ///
    /// Saved data of an unexpected shape is ignored, which makes the
    /// pairing flow request a fresh credential.
    pub fn from_saved(saved: Option<Value>) -> Self {
        let data = match saved {
            None | Some(Value::Null) => Self::default(),
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unusable saved data: {}", e);
                Self::default()
            }),
        };

        Self {
            username: data.username.filter(|username| !username.trim().is_empty()),
        }
    }

    pub fn to_value(&self) -> Value {
        match &self.username {
            Some(username) => json!({ "username": username }),
            None => json!({}),
        }
    }
}
