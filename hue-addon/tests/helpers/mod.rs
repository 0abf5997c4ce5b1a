//! In-memory bridge for testing the addon without a real Hue bridge.
//!
//! `MockBridge` keeps a whitelist, a list of lights and a log of saved
//! lights. User creation can be configured to succeed or to fail with any
//! bridge error code.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use hue_api::{
    error_codes, ApiError, BridgeClient, BridgeConnector, Light, LightModel, LightState, NewUser,
    User,
};
use hue_addon::{AddonMetadata, ProvidedInput, SaveData};
use parking_lot::Mutex;
use serde_json::Value;

/// What `create_user` does when called
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    Issue(String),
    Fail(u16),
    Unreachable,
}

pub struct MockBridge {
    username: Mutex<Option<String>>,
    whitelist: Mutex<HashSet<String>>,
    create_outcome: Mutex<CreateOutcome>,
    lights: Mutex<Vec<Light>>,
    saved_lights: Mutex<Vec<Light>>,
    create_calls: AtomicUsize,
    offline: AtomicBool,
    connected_with: Mutex<Vec<Option<String>>>,
}

impl MockBridge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            username: Mutex::new(None),
            whitelist: Mutex::new(HashSet::new()),
            create_outcome: Mutex::new(CreateOutcome::Fail(error_codes::LINK_BUTTON_NOT_PRESSED)),
            lights: Mutex::new(Vec::new()),
            saved_lights: Mutex::new(Vec::new()),
            create_calls: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
            connected_with: Mutex::new(Vec::new()),
        })
    }

    pub fn whitelist(&self, username: &str) {
        self.whitelist.lock().insert(username.to_string());
    }

    pub fn on_create(&self, outcome: CreateOutcome) {
        *self.create_outcome.lock() = outcome;
    }

    /// Make every later request fail as if the bridge were unreachable
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn add_light(&self, light: Light) {
        self.lights.lock().push(light);
    }

    /// Change a light on the "bridge" side, as another app would
    pub fn modify_light(&self, id: &str, change: impl FnOnce(&mut Light)) {
        if let Some(light) = self.lights.lock().iter_mut().find(|light| light.id == id) {
            change(light);
        }
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn saved_lights(&self) -> Vec<Light> {
        self.saved_lights.lock().clone()
    }

    pub fn connected_with(&self) -> Vec<Option<String>> {
        self.connected_with.lock().clone()
    }

    fn reachable(&self) -> Result<(), ApiError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(ApiError::NetworkError("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn bridge_error(code: u16) -> ApiError {
        ApiError::Bridge {
            code,
            address: "/".to_string(),
            description: "mock bridge error".to_string(),
        }
    }
}

#[async_trait]
impl BridgeClient for MockBridge {
    fn host(&self) -> &str {
        "mock-bridge"
    }

    fn username(&self) -> Option<String> {
        self.username.lock().clone()
    }

    fn set_username(&self, username: String) {
        *self.username.lock() = Some(username);
    }

    async fn is_authenticated(&self) -> Result<bool, ApiError> {
        self.reachable()?;
        Ok(self
            .username()
            .map(|username| self.whitelist.lock().contains(&username))
            .unwrap_or(false))
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.reachable()?;
        match self.username() {
            Some(username) if self.whitelist.lock().contains(&username) => {
                Ok(User::issued(username, "consequences-hue"))
            }
            _ => Err(Self::bridge_error(error_codes::UNAUTHORIZED_USER)),
        }
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, ApiError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.reachable()?;
        let outcome = self.create_outcome.lock().clone();
        match outcome {
            CreateOutcome::Issue(username) => {
                self.whitelist(&username);
                Ok(User::issued(username, new_user.device_type()))
            }
            CreateOutcome::Fail(code) => Err(Self::bridge_error(code)),
            CreateOutcome::Unreachable => {
                Err(ApiError::NetworkError("connection refused".to_string()))
            }
        }
    }

    async fn lights(&self) -> Result<Vec<Light>, ApiError> {
        self.reachable()?;
        Ok(self.lights.lock().clone())
    }

    async fn light(&self, id: &str) -> Result<Light, ApiError> {
        self.reachable()?;
        self.lights
            .lock()
            .iter()
            .find(|light| light.id == id)
            .cloned()
            .ok_or_else(|| Self::bridge_error(error_codes::RESOURCE_NOT_AVAILABLE))
    }

    async fn save_light(&self, light: &Light) -> Result<(), ApiError> {
        self.reachable()?;
        self.saved_lights.lock().push(light.clone());
        self.modify_light(&light.id, |stored| *stored = light.clone());
        Ok(())
    }

    async fn update_light(&self, previous: &Light, updated: &Light) -> Result<(), ApiError> {
        previous.check_update(updated)?;
        self.save_light(updated).await
    }
}

/// Connector handing out the same mock bridge for every connection
pub struct MockConnector {
    pub bridge: Arc<MockBridge>,
}

impl MockConnector {
    pub fn new(bridge: Arc<MockBridge>) -> Arc<Self> {
        Arc::new(Self { bridge })
    }
}

impl BridgeConnector for MockConnector {
    fn connect(&self, _host: &str, username: Option<String>) -> Result<Arc<dyn BridgeClient>, ApiError> {
        self.bridge.connected_with.lock().push(username.clone());
        *self.bridge.username.lock() = username;
        Ok(Arc::clone(&self.bridge) as Arc<dyn BridgeClient>)
    }
}

/// Save callback recording everything the addon persisted
pub fn recording_save_data() -> (SaveData, Arc<Mutex<Vec<Value>>>) {
    let saved = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&saved);
    let save_data: SaveData = Arc::new(move |data: Value| sink.lock().push(data));
    (save_data, saved)
}

pub fn metadata(ip: &str, username: Option<&str>) -> AddonMetadata {
    let mut inputs = vec![ProvidedInput::new("ip", ip)];
    if let Some(username) = username {
        inputs.push(ProvidedInput::new("username", username));
    }
    AddonMetadata::new("test-instance", inputs)
}

pub fn color_light(id: &str, name: &str) -> Light {
    Light {
        id: id.to_string(),
        unique_id: format!("00:17:88:01:00:00:00:0{}-0b", id),
        name: name.to_string(),
        light_type: "Extended color light".to_string(),
        model: LightModel {
            id: "LCT007".to_string(),
            name: "Hue bulb A19".to_string(),
        },
        software_version: Some("5.105.0.21169".to_string()),
        state: LightState {
            on: true,
            reachable: true,
            brightness: Some(254),
            hue: Some(8418),
            saturation: Some(140),
            color_temp: Some(366),
        },
    }
}

pub fn white_light(id: &str, name: &str) -> Light {
    Light {
        id: id.to_string(),
        unique_id: format!("00:17:88:01:00:00:00:0{}-0b", id),
        name: name.to_string(),
        light_type: "Dimmable light".to_string(),
        model: LightModel {
            id: "LWB010".to_string(),
            name: "Hue white lamp".to_string(),
        },
        software_version: None,
        state: LightState {
            on: false,
            reachable: true,
            brightness: Some(1),
            hue: None,
            saturation: None,
            color_temp: None,
        },
    }
}
