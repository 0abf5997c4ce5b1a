//! Light variables against an in-memory bridge: reads, change events and
//! writes that go back to the bridge.

mod helpers;

use std::sync::Arc;

use helpers::{color_light, white_light, MockBridge};
use hue_addon::{
    AddonError, ChangeEvent, HueAddon, LightBulb, Variable, VariableCollection,
};
use hue_api::{ApiError, BridgeClient};
use parking_lot::Mutex;
use rstest::rstest;
use serde_json::{json, Value};

fn addon(bridge: &Arc<MockBridge>) -> HueAddon {
    HueAddon::new(
        helpers::metadata("192.168.1.2", None),
        Arc::clone(bridge) as Arc<dyn BridgeClient>,
    )
}

fn bulb(bridge: &Arc<MockBridge>, light: hue_api::Light) -> LightBulb {
    LightBulb::new(Arc::clone(bridge) as Arc<dyn BridgeClient>, light).unwrap()
}

async fn write(light: &LightBulb, variable: &str, value: Value) -> Result<(), AddonError> {
    light
        .variable(variable)
        .unwrap()
        .as_updatable()
        .unwrap()
        .update_value(value)
        .await
}

fn recorded_events(variable: &Arc<dyn Variable>) -> Arc<Mutex<Vec<ChangeEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    variable.add_change_listener(Arc::new(move |event: &ChangeEvent| {
        sink.lock().push(event.clone());
    }));
    events
}

#[tokio::test]
async fn test_color_light_exposes_all_variables() {
    let bridge = MockBridge::new();
    let light = bulb(&bridge, color_light("1", "Kitchen"));

    let names: Vec<&str> = light.variables().iter().map(|v| v.name()).collect();
    assert_eq!(
        names,
        vec!["Brightness", "On", "Hue", "Saturation", "Name", "Reachable"]
    );
    assert_eq!(light.unique_id(), "00:17:88:01:00:00:00:01-0b");
    assert_eq!(light.name(), "Hue bulb A19");
}

#[tokio::test]
async fn test_white_light_skips_color_variables() {
    let bridge = MockBridge::new();
    let light = bulb(&bridge, white_light("2", "Hallway"));

    assert!(light.variable("Hue").is_none());
    assert!(light.variable("Saturation").is_none());
    assert!(light.variable("Brightness").is_some());
    assert_eq!(light.variables().len(), 4);
}

#[tokio::test]
async fn test_variable_unique_ids() {
    let bridge = MockBridge::new();
    let light = bulb(&bridge, color_light("1", "Kitchen"));

    let brightness = light.variable("Brightness").unwrap();
    assert_eq!(brightness.unique_id(), "00:17:88:01:00:00:00:01-0b-Brightness");
}

#[tokio::test]
async fn test_reads_current_values() {
    let bridge = MockBridge::new();
    let light = bulb(&bridge, color_light("1", "Kitchen"));

    let read = |name: &str| light.variable(name).unwrap();
    assert_eq!(read("Brightness").retrieve_value().await.unwrap(), json!(254));
    assert_eq!(read("On").retrieve_value().await.unwrap(), json!(true));
    assert_eq!(read("Hue").retrieve_value().await.unwrap(), json!(8418));
    assert_eq!(read("Name").retrieve_value().await.unwrap(), json!("Kitchen"));
    assert_eq!(read("Reachable").retrieve_value().await.unwrap(), json!(true));
}

#[tokio::test]
async fn test_unchanged_reads_emit_nothing() {
    let bridge = MockBridge::new();
    let light = bulb(&bridge, color_light("1", "Kitchen"));
    let brightness = light.variable("Brightness").unwrap();
    let events = recorded_events(&brightness);

    brightness.retrieve_value().await.unwrap();
    brightness.retrieve_value().await.unwrap();

    assert!(events.lock().is_empty());
}

#[tokio::test]
async fn test_refresh_picks_up_external_change() {
    let bridge = MockBridge::new();
    bridge.add_light(color_light("1", "Kitchen"));
    let light = bulb(&bridge, color_light("1", "Kitchen"));
    let brightness = light.variable("Brightness").unwrap();
    let events = recorded_events(&brightness);

    brightness.retrieve_value().await.unwrap();
    bridge.modify_light("1", |light| light.state.brightness = Some(40));
    light.refresh().await.unwrap();
    assert_eq!(brightness.retrieve_value().await.unwrap(), json!(40));
    brightness.retrieve_value().await.unwrap();

    let events = events.lock();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0],
        ChangeEvent::new(brightness.unique_id(), json!(254), json!(40))
    );
}

#[tokio::test]
async fn test_refresh_of_removed_light_fails() {
    let bridge = MockBridge::new();
    let light = bulb(&bridge, color_light("9", "Gone"));

    assert!(matches!(light.refresh().await, Err(AddonError::Api(_))));
}

#[tokio::test]
async fn test_nested_write_saves_whole_light() {
    let bridge = MockBridge::new();
    bridge.add_light(color_light("1", "Kitchen"));
    let light = bulb(&bridge, color_light("1", "Kitchen"));

    light
        .variable("Brightness")
        .unwrap()
        .as_updatable()
        .unwrap()
        .update_value(json!(100))
        .await
        .unwrap();

    let mut expected = color_light("1", "Kitchen");
    expected.state.brightness = Some(100);
    assert_eq!(bridge.saved_lights(), vec![expected.clone()]);
    assert_eq!(light.light(), expected);
}

#[tokio::test]
async fn test_write_is_seen_by_sibling_reads() {
    let bridge = MockBridge::new();
    let light = bulb(&bridge, color_light("1", "Kitchen"));
    let on = light.variable("On").unwrap();
    let events = recorded_events(&on);

    on.retrieve_value().await.unwrap();
    on.as_updatable()
        .unwrap()
        .update_value(json!(false))
        .await
        .unwrap();

    assert_eq!(on.retrieve_value().await.unwrap(), json!(false));
    assert_eq!(events.lock().len(), 1);
    assert!(!bridge.saved_lights()[0].state.on);
}

#[tokio::test]
async fn test_rename_through_name_variable() {
    let bridge = MockBridge::new();
    bridge.add_light(color_light("1", "Kitchen"));
    let light = bulb(&bridge, color_light("1", "Kitchen"));

    light
        .variable("Name")
        .unwrap()
        .as_updatable()
        .unwrap()
        .update_value(json!("Pantry"))
        .await
        .unwrap();

    assert_eq!(bridge.light("1").await.unwrap().name, "Pantry");
}

#[tokio::test]
async fn test_reachable_is_read_only() {
    let bridge = MockBridge::new();
    let light = bulb(&bridge, color_light("1", "Kitchen"));

    assert!(light.variable("Reachable").unwrap().as_updatable().is_none());
}

#[tokio::test]
async fn test_write_of_wrong_type_is_rejected() {
    let bridge = MockBridge::new();
    let light = bulb(&bridge, color_light("1", "Kitchen"));

    let result = light
        .variable("Brightness")
        .unwrap()
        .as_updatable()
        .unwrap()
        .update_value(json!("bright"))
        .await;

    assert!(matches!(result, Err(AddonError::InvalidValue { .. })));
    assert!(bridge.saved_lights().is_empty());
    assert_eq!(light.light().state.brightness, Some(254));
}

#[tokio::test]
async fn test_addon_lists_lights_in_bridge_order() {
    let bridge = MockBridge::new();
    bridge.add_light(color_light("1", "Kitchen"));
    bridge.add_light(white_light("2", "Hallway"));

    let bulbs = addon(&bridge).light_bulbs().await.unwrap();

    let ids: Vec<&str> = bulbs.iter().map(|bulb| bulb.light_id()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(bulbs[0].name(), "Hue bulb A19");
    assert_eq!(bulbs[1].name(), "Hue white lamp");
    assert_eq!(bulbs[1].light().name, "Hallway");
}

#[rstest]
#[case("Brightness", json!(200))]
#[case("Hue", json!(100))]
#[case("Saturation", json!(10))]
#[tokio::test]
async fn test_state_write_on_light_that_is_off_is_refused(
    #[case] variable: &str,
    #[case] value: Value,
) {
    let bridge = MockBridge::new();
    let mut off = color_light("1", "Kitchen");
    off.state.on = false;
    let light = bulb(&bridge, off.clone());

    let result = write(&light, variable, value).await;

    match result {
        Err(AddonError::InvalidValue { reason, .. }) => assert!(reason.contains("is off")),
        other => panic!("Expected InvalidValue, got {:?}", other),
    }
    assert!(bridge.saved_lights().is_empty());
    assert_eq!(light.light(), off);
}

#[tokio::test]
async fn test_turning_light_on_then_dimming() {
    let bridge = MockBridge::new();
    let mut off = color_light("1", "Kitchen");
    off.state.on = false;
    let light = bulb(&bridge, off);

    write(&light, "On", json!(true)).await.unwrap();
    write(&light, "Brightness", json!(200)).await.unwrap();

    assert_eq!(light.light().state.brightness, Some(200));
    assert_eq!(bridge.saved_lights().len(), 2);
}

#[rstest]
#[case("Brightness", json!(0), false)]
#[case("Brightness", json!(1), true)]
#[case("Brightness", json!(254), true)]
#[case("Brightness", json!(255), false)]
#[case("Saturation", json!(0), true)]
#[case("Saturation", json!(254), true)]
#[case("Saturation", json!(255), false)]
#[case("Name", json!(""), false)]
#[tokio::test]
async fn test_write_range_limits(
    #[case] variable: &str,
    #[case] value: Value,
    #[case] accepted: bool,
) {
    let bridge = MockBridge::new();
    let light = bulb(&bridge, color_light("1", "Kitchen"));

    let result = write(&light, variable, value).await;

    if accepted {
        assert!(result.is_ok(), "{:?}", result);
        assert_eq!(bridge.saved_lights().len(), 1);
    } else {
        assert!(matches!(result, Err(AddonError::InvalidValue { .. })));
        assert!(bridge.saved_lights().is_empty());
        assert_eq!(light.light(), color_light("1", "Kitchen"));
    }
}

#[tokio::test]
async fn test_failed_save_keeps_bridge_value() {
    let bridge = MockBridge::new();
    let light = bulb(&bridge, color_light("1", "Kitchen"));
    let brightness = light.variable("Brightness").unwrap();
    bridge.go_offline();

    let result = write(&light, "Brightness", json!(10)).await;

    assert!(matches!(result, Err(AddonError::Api(ApiError::NetworkError(_)))));
    assert_eq!(brightness.retrieve_value().await.unwrap(), json!(254));
    assert_eq!(light.light(), color_light("1", "Kitchen"));
}
