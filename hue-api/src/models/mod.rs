//! Bridge resource models

pub mod light;
pub mod user;

pub use light::{Light, LightModel, LightState};
pub use user::{NewUser, User};
