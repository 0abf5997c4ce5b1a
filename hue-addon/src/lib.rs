//! # Hue addon - Philips Hue lights for the consequences host
//!
//! Pairs with a Hue bridge and exposes every light as a collection of
//! observable, writable variables:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hue_addon::{
//!     Addon, AddonInitialiser, AddonMetadata, HueInitialiser, ProvidedInput, Variable,
//!     VariableCollection,
//! };
//!
//! # async fn run() -> Result<(), hue_addon::AddonError> {
//! let initialiser = HueInitialiser::new();
//! let metadata = AddonMetadata::new(
//!     "living-room-bridge",
//!     vec![ProvidedInput::new("ip", "192.168.1.2")],
//! );
//!
//! // Press the bridge's link button before the first run
//! let addon = initialiser
//!     .create_instance(metadata, Arc::new(|data: serde_json::Value| println!("persist {}", data)), None)
//!     .await?;
//!
//! for light in addon.variables().await? {
//!     for variable in light.variables() {
//!         println!("{} = {}", variable.unique_id(), variable.retrieve_value().await?);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Variables per light
//!
//! | Name         | Key path           | Writable |
//! |--------------|--------------------|----------|
//! | `Brightness` | `state.brightness` | yes      |
//! | `On`         | `state.on`         | yes      |
//! | `Hue`        | `state.hue`        | yes      |
//! | `Saturation` | `state.saturation` | yes      |
//! | `Name`       | `name`             | yes      |
//! | `Reachable`  | `state.reachable`  | no       |
//!
//! Variables for features a light lacks are not exposed.
//!
//! ## Architecture
//!
//! ```text
//! hue-addon (host contract, pairing, variables)
//!     ↓
//! hue-api (BridgeClient, light and user models)
//!     ↓
//! hue-client (JSON over HTTP)
//! ```

pub use addon::HueAddon;
pub use error::AddonError;
pub use event::{ChangeEvent, ChangeListener, ListenerId};
pub use host::{
    Addon, AddonInitialiser, AddonMetadata, InitialiserMetadata, ProvidedInput, SaveData,
    UpdatableVariable, UserInput, UserInputKind, Variable, VariableCollection,
};
pub use initialiser::{HueInitialiser, DEFAULT_DEVICE_TYPE, IP_INPUT, USERNAME_INPUT};
pub use light::{LightBulb, LightSink};
pub use path::{KeyPath, PathError};
pub use saved_data::SavedData;
pub use variable::{ObjectVariable, ResourceSink, SharedResource, UpdatableObjectVariable};

mod addon;
mod error;
pub mod event;
pub mod host;
mod initialiser;
mod light;
pub mod logging;
pub mod path;
mod saved_data;
pub mod variable;
