use marionette_api_core::pose::{ik_key, rotation_key, Channel};
use marionette_api_core::{Pose, Value, Vec2};

#[test]
fn channel_keys_round_trip_through_parse() {
    assert_eq!(Channel::parse(&rotation_key("spine")), Channel::Rotation("spine"));
    assert_eq!(Channel::parse("pelvis.offset"), Channel::Offset("pelvis"));
    assert_eq!(Channel::parse(&ik_key("foot_l")), Channel::IkTarget("foot_l"));
    assert_eq!(Channel::parse("opacity"), Channel::Property("opacity"));
}

#[test]
fn typed_accessors_ignore_wrong_kinds() {
    let mut pose = Pose::new();
    pose.set_rotation("head", 0.25);
    pose.insert("arm.rotation".to_string(), Value::Text("nope".into()));
    pose.set_offset("pelvis", Vec2::new(1.0, -2.0));

    assert_eq!(pose.rotation("head"), Some(0.25));
    assert_eq!(pose.rotation("arm"), None);
    assert_eq!(pose.offset("pelvis"), Some(Vec2::new(1.0, -2.0)));
}

#[test]
fn merge_overrides_and_properties_filters() {
    let mut base = Pose::new();
    base.insert("opacity", Value::Float(0.5));
    base.set_rotation("spine", 0.1);

    let mut top = Pose::new();
    top.insert("opacity", Value::Float(1.0));
    top.set_ik_target("foot_l", Vec2::ZERO);
    base.merge(top);

    assert_eq!(base.scalar("opacity"), Some(1.0));
    let props = base.properties();
    assert_eq!(props.len(), 1);
    assert!(props.contains("opacity"));
}

#[test]
fn pose_serializes_as_plain_map() {
    let mut pose = Pose::new();
    pose.insert("mouth", Value::Text("A".into()));
    let json = serde_json::to_value(&pose).expect("serialize pose");
    assert_eq!(json["mouth"]["type"], "text");
    assert_eq!(json["mouth"]["data"], "A");
}
