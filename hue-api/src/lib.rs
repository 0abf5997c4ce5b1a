//! # Hue API - typed access to a Philips Hue bridge
//!
//! Covers the small part of the bridge API the addon needs: checking and
//! creating credentials, and listing, reading and saving lights.
//!
//! ```rust,no_run
//! use hue_api::{BridgeClient, HueBridge, NewUser};
//!
//! # async fn run() -> hue_api::Result<()> {
//! let bridge = HueBridge::new("192.168.1.2", None)?;
//!
//! if !bridge.is_authenticated().await? {
//!     // Press the link button on the bridge first
//!     let user = bridge.create_user(&NewUser::new("consequences-hue")?).await?;
//!     bridge.set_username(user.username);
//! }
//!
//! for light in bridge.lights().await? {
//!     println!("{}: {:?}", light.name, light.state.brightness);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! hue-api (BridgeClient, models)
//!     ↓
//! hue-client (JSON over HTTP, bridge error envelope)
//! ```

pub mod client;
pub mod connector;
pub mod error;
pub mod models;

pub use client::{BridgeClient, HueBridge};
pub use connector::{BridgeConnector, HttpConnector};
pub use error::{error_codes, ApiError, Result};
pub use models::{Light, LightModel, LightState, NewUser, User};

pub use hue_client::ClientConfig;
