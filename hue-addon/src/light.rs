//! Lights as variable collections
//!
//! Every light becomes a [`LightBulb`] named after its hardware model, with
//! one variable per entry of `LIGHT_VARIABLES` the light supports. Writes
//! are checked against the bridge's limits and sent through [`LightSink`].

use std::sync::Arc;

use async_trait::async_trait;
use hue_api::{ApiError, BridgeClient, Light};
use parking_lot::RwLock;
use serde_json::Value;

use crate::host::{Variable, VariableCollection};
use crate::path::KeyPath;
use crate::variable::{ObjectVariable, ResourceSink, SharedResource, UpdatableObjectVariable};
use crate::AddonError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    ReadOnly,
    Writable,
}

/// Variables exposed for every light: name, key path, access
const LIGHT_VARIABLES: &[(&str, &str, Access)] = &[
    ("Brightness", "state.brightness", Access::Writable),
    ("On", "state.on", Access::Writable),
    ("Hue", "state.hue", Access::Writable),
    ("Saturation", "state.saturation", Access::Writable),
    ("Name", "name", Access::Writable),
    ("Reachable", "state.reachable", Access::ReadOnly),
];

/// Saves lights written through variables back to the bridge
pub struct LightSink {
    client: Arc<dyn BridgeClient>,
}

impl LightSink {
    pub fn new(client: Arc<dyn BridgeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceSink<Light> for LightSink {
    fn validate(&self, current: &Light, updated: &Light) -> Result<(), ApiError> {
        current.check_update(updated)
    }

    async fn save(&self, previous: &Light, updated: &Light) -> Result<(), ApiError> {
        self.client.update_light(previous, updated).await
    }
}

/// A single light exposed to the host as a variable collection
pub struct LightBulb {
    unique_id: String,
    name: String,
    light_id: String,
    resource: SharedResource<Light>,
    client: Arc<dyn BridgeClient>,
    variables: Vec<Arc<dyn Variable>>,
}

impl LightBulb {
    /// Wrap `light`; features the light type lacks (e.g. hue on a white
    /// bulb) get no variable
    pub fn new(client: Arc<dyn BridgeClient>, light: Light) -> Result<Self, AddonError> {
        let tree = serde_json::to_value(&light)?;
        let unique_id = light.unique_id.clone();
        let name = light.model.name.clone();
        let light_id = light.id.clone();

        let resource: SharedResource<Light> = Arc::new(RwLock::new(light));
        let sink: Arc<dyn ResourceSink<Light>> = Arc::new(LightSink::new(Arc::clone(&client)));

        let mut variables: Vec<Arc<dyn Variable>> = Vec::with_capacity(LIGHT_VARIABLES.len());
        for (variable_name, path, access) in LIGHT_VARIABLES {
            let key_path = KeyPath::parse(path)?;
            if key_path.get(&tree)? == &Value::Null {
                continue;
            }

            let variable: Arc<dyn Variable> = match access {
                Access::ReadOnly => Arc::new(ObjectVariable::new(
                    *variable_name,
                    unique_id.as_str(),
                    key_path,
                    Arc::clone(&resource),
                )),
                Access::Writable => Arc::new(UpdatableObjectVariable::new(
                    *variable_name,
                    unique_id.as_str(),
                    key_path,
                    Arc::clone(&resource),
                    Arc::clone(&sink),
                )),
            };
            variables.push(variable);
        }

        Ok(Self {
            unique_id,
            name,
            light_id,
            resource,
            client,
            variables,
        })
    }

    /// Bridge-local id of the light
    pub fn light_id(&self) -> &str {
        &self.light_id
    }

    /// Snapshot of the light as the variables currently see it
    pub fn light(&self) -> Light {
        self.resource.read().clone()
    }

    pub fn resource(&self) -> &SharedResource<Light> {
        &self.resource
    }

    pub fn variable(&self, name: &str) -> Option<Arc<dyn Variable>> {
        self.variables
            .iter()
            .find(|variable| variable.name() == name)
            .cloned()
    }

    /// Re-read the light from the bridge so the next variable reads observe
    /// changes made outside this addon
    pub async fn refresh(&self) -> Result<(), AddonError> {
        let fresh = self.client.light(&self.light_id).await?;
        *self.resource.write() = fresh;
        Ok(())
    }
}

impl VariableCollection for LightBulb {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn variables(&self) -> &[Arc<dyn Variable>] {
        &self.variables
    }
}

impl std::fmt::Debug for LightBulb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightBulb")
            .field("unique_id", &self.unique_id)
            .field("name", &self.name)
            .field("light_id", &self.light_id)
            .field("variable_count", &self.variables.len())
            .finish()
    }
}
