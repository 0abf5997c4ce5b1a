//! The addon instance handed to the host once pairing succeeded

use std::sync::Arc;

use async_trait::async_trait;
use hue_api::BridgeClient;

use crate::host::{Addon, AddonMetadata, VariableCollection};
use crate::light::LightBulb;
use crate::AddonError;

/// A paired Hue bridge exposed to the host
pub struct HueAddon {
    metadata: AddonMetadata,
    client: Arc<dyn BridgeClient>,
}

impl HueAddon {
    pub fn new(metadata: AddonMetadata, client: Arc<dyn BridgeClient>) -> Self {
        Self { metadata, client }
    }

    pub fn client(&self) -> &Arc<dyn BridgeClient> {
        &self.client
    }

    /// One collection per light currently known to the bridge
    ///
    /// Every call lists the lights again, so lights added to the bridge
    /// show up and the returned collections start from fresh state.
    pub async fn light_bulbs(&self) -> Result<Vec<LightBulb>, AddonError> {
        self.client
            .lights()
            .await?
            .into_iter()
            .map(|light| LightBulb::new(Arc::clone(&self.client), light))
            .collect()
    }
}

#[async_trait]
impl Addon for HueAddon {
    fn metadata(&self) -> &AddonMetadata {
        &self.metadata
    }

    async fn variables(&self) -> Result<Vec<Arc<dyn VariableCollection>>, AddonError> {
        Ok(self
            .light_bulbs()
            .await?
            .into_iter()
            .map(|bulb| Arc::new(bulb) as Arc<dyn VariableCollection>)
            .collect())
    }
}

impl std::fmt::Debug for HueAddon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HueAddon")
            .field("instance_id", &self.metadata.instance_id)
            .field("bridge", &self.client.host())
            .finish()
    }
}
