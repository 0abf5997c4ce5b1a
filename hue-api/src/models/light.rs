//! Light resources
//!
//! The bridge speaks in terse wire names (`bri`, `sat`, `modelid`). [`Light`]
//! is the friendlier view handed to callers; its serialized form is what the
//! addon walks with dotted paths such as `state.brightness`.

use std::fmt::Display;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::ApiError;

/// Brightness values the bridge accepts
pub const BRIGHTNESS_RANGE: RangeInclusive<u8> = 1..=254;
/// Saturation values the bridge accepts
pub const SATURATION_RANGE: RangeInclusive<u8> = 0..=254;
/// Hue values the bridge accepts
pub const HUE_RANGE: RangeInclusive<u16> = 0..=u16::MAX;
/// Colour temperatures (mireds) the bridge accepts
pub const COLOR_TEMP_RANGE: RangeInclusive<u16> = 153..=500;
/// Longest light name the bridge stores
pub const MAX_NAME_LEN: usize = 32;

/// A light as reported by the bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Light {
    /// Bridge-local id used in resource URLs (`/lights/<id>`)
    pub id: String,
    /// Globally unique id of the light (MAC address plus endpoint)
    pub unique_id: String,
    /// User-assigned name
    pub name: String,
    #[serde(rename = "type")]
    pub light_type: String,
    pub model: LightModel,
    pub software_version: Option<String>,
    pub state: LightState,
}

/// Hardware model of a light
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightModel {
    pub id: String,
    pub name: String,
}

/// Current state of a light
///
/// Optional fields are absent for light types that do not support them,
/// e.g. on/off plugs have no brightness and white bulbs have no hue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightState {
    pub on: bool,
    pub reachable: bool,
    /// Brightness, 1 to 254
    pub brightness: Option<u8>,
    /// Hue, 0 to 65535
    pub hue: Option<u16>,
    /// Saturation, 0 to 254
    pub saturation: Option<u8>,
    /// Colour temperature in mireds, 153 to 500
    pub color_temp: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLight {
    state: RawLightState,
    #[serde(rename = "type")]
    light_type: String,
    name: String,
    modelid: String,
    uniqueid: Option<String>,
    swversion: Option<String>,
    productname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLightState {
    on: bool,
    #[serde(default)]
    reachable: bool,
    bri: Option<u8>,
    hue: Option<u16>,
    sat: Option<u8>,
    ct: Option<u16>,
}

impl Light {
    pub(crate) fn from_raw(id: String, raw: RawLight) -> Self {
        let model_name = raw
            .productname
            .unwrap_or_else(|| model_name(&raw.modelid).to_string());

        Self {
            unique_id: raw.uniqueid.unwrap_or_else(|| id.clone()),
            id,
            name: raw.name,
            light_type: raw.light_type,
            model: LightModel {
                id: raw.modelid,
                name: model_name,
            },
            software_version: raw.swversion,
            state: LightState {
                on: raw.state.on,
                reachable: raw.state.reachable,
                brightness: raw.state.bri,
                hue: raw.state.hue,
                saturation: raw.state.sat,
                color_temp: raw.state.ct,
            },
        }
    }

    /// Body for `PUT /lights/<id>`
    pub fn attribute_update(&self) -> Value {
        json!({ "name": self.name })
    }

    /// Body for `PUT /lights/<id>/state`
    ///
    /// A light that is off only accepts `on`; the bridge rejects every other
    /// state parameter with error 201, so they are left out.
    pub fn state_update(&self) -> Value {
        let mut body = Map::new();
        body.insert("on".to_string(), Value::Bool(self.state.on));

        if self.state.on {
            if let Some(bri) = self.state.brightness {
                body.insert("bri".to_string(), json!(bri));
            }
            if let Some(hue) = self.state.hue {
                body.insert("hue".to_string(), json!(hue));
            }
            if let Some(sat) = self.state.saturation {
                body.insert("sat".to_string(), json!(sat));
            }
            if let Some(ct) = self.state.color_temp {
                body.insert("ct".to_string(), json!(ct));
            }
        }

        Value::Object(body)
    }

    /// Check that `updated` is a change the bridge would apply to `self`
    ///
    /// Only fields that differ are checked, so values the bridge itself
    /// reported never block an unrelated write. A light that is off rejects
    /// every state parameter except `on` (bridge error 201), so changing one
    /// on an off light is refused here instead of being dropped silently.
    pub fn check_update(&self, updated: &Light) -> Result<(), ApiError> {
        if updated.id != self.id
            || updated.unique_id != self.unique_id
            || updated.light_type != self.light_type
            || updated.model != self.model
            || updated.software_version != self.software_version
            || updated.state.reachable != self.state.reachable
        {
            return Err(ApiError::InvalidParameter(format!(
                "light {}: only the name and writable state can change",
                self.id
            )));
        }

        if updated.name != self.name {
            let length = updated.name.chars().count();
            if updated.name.trim().is_empty() || length > MAX_NAME_LEN {
                return Err(ApiError::InvalidParameter(format!(
                    "light name must be 1 to {} characters, got {}",
                    MAX_NAME_LEN, length
                )));
            }
        }

        let (old, new) = (&self.state, &updated.state);
        let parameters = [
            check_parameter("brightness", old.brightness, new.brightness, &BRIGHTNESS_RANGE)?,
            check_parameter("hue", old.hue, new.hue, &HUE_RANGE)?,
            check_parameter("saturation", old.saturation, new.saturation, &SATURATION_RANGE)?,
            check_parameter("colorTemp", old.color_temp, new.color_temp, &COLOR_TEMP_RANGE)?,
        ];

        if !new.on {
            if let Some(parameter) = parameters.into_iter().flatten().next() {
                return Err(ApiError::InvalidParameter(format!(
                    "light {} is off, turn it on before changing {}",
                    self.id, parameter
                )));
            }
        }

        Ok(())
    }

    /// Whether `updated` needs `PUT /lights/<id>`
    pub fn attributes_changed(&self, updated: &Light) -> bool {
        self.name != updated.name
    }

    /// Whether `updated` needs `PUT /lights/<id>/state`
    pub fn state_changed(&self, updated: &Light) -> bool {
        self.state != updated.state
    }
}

/// Returns the parameter name when it changed to a valid value
fn check_parameter<T>(
    name: &'static str,
    previous: Option<T>,
    updated: Option<T>,
    range: &RangeInclusive<T>,
) -> Result<Option<&'static str>, ApiError>
where
    T: PartialOrd + PartialEq + Copy + Display,
{
    if previous == updated {
        return Ok(None);
    }

    match updated {
        Some(value) if range.contains(&value) => Ok(Some(name)),
        Some(value) => Err(ApiError::InvalidParameter(format!(
            "{} {} is outside {}..={}",
            name,
            value,
            range.start(),
            range.end()
        ))),
        None => Err(ApiError::InvalidParameter(format!("{} cannot be cleared", name))),
    }
}

/// Marketing name for a model id, falling back to the id itself
pub fn model_name(model_id: &str) -> &str {
    match model_id {
        "LCT001" | "LCT007" | "LCT010" | "LCT014" => "Hue bulb A19",
        "LCT002" => "Hue Spot BR30",
        "LCT003" => "Hue Spot GU10",
        "LCT015" | "LCT016" => "Hue color lamp",
        "LLC010" => "Hue Living Colors Iris",
        "LLC011" | "LLC012" => "Hue Living Colors Bloom",
        "LLC020" => "Hue Go",
        "LST001" => "Hue LightStrips",
        "LST002" => "Hue LightStrips Plus",
        "LWB004" => "Hue A19 Lux",
        "LWB006" | "LWB010" | "LWB014" => "Hue white lamp",
        "LTW001" | "LTW004" | "LTW010" => "Hue A19 White Ambiance",
        other => other,
    }
}
