use std::sync::Arc;

use marionette_animation_core::{AnimationClip, Easing, LipSyncTrack, LoopMode, Value};
use marionette_api_core::Vec2;
use marionette_motion_core::{Gesture, LocomotionState, TriggerOutcome};
use marionette_orchestrator::{Character, RigConfig};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

const GAIT_JOINTS: [&str; 8] = [
    "thigh_l",
    "thigh_r",
    "shin_l",
    "shin_r",
    "upper_arm_l",
    "upper_arm_r",
    "forearm_l",
    "forearm_r",
];

#[test]
fn idle_character_starts_in_rest_pose() {
    let config = RigConfig {
        scale: 1.5,
        ..RigConfig::default()
    };
    let mut character = Character::new(config).unwrap();
    let frame = character.advance(0.0);

    let sk = character.skeleton();
    for name in GAIT_JOINTS {
        let bone = sk.bone(name).unwrap();
        assert!(
            approx(bone.local_rotation(), bone.rest_rotation(), 1e-2),
            "{name}: {} vs rest {}",
            bone.local_rotation(),
            bone.rest_rotation()
        );
    }
    assert!(frame.missing.is_empty());
    assert_eq!(frame.pelvis_drop, 0.0);
    assert!(approx(frame.unit, 60.0, 1e-3));

    let ground = character.rig().ground_y();
    for shin in ["shin_l", "shin_r"] {
        assert!(approx(frame.bone(shin).unwrap().end.y, ground, 1e-2));
    }
}

#[test]
fn profile_walk_keeps_a_foot_planted() {
    let json = marionette_test_fixtures::rigs::json("side-profile").unwrap();
    let mut character = Character::from_json_str(&json).unwrap();
    character.set_locomotion(LocomotionState::Walk, 0.0);
    let ground = character.rig().ground_y();
    let dt = character.config().frame_dt();

    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    for _ in 0..48 {
        let frame = character.advance(dt);
        let left = frame.bone("shin_l").unwrap().end;
        let right = frame.bone("shin_r").unwrap().end;
        assert!(left.y <= ground + 0.5 && right.y <= ground + 0.5);
        let planted = (ground - left.y).abs().min((ground - right.y).abs());
        assert!(planted < 0.5, "no foot on the ground at t={}", frame.time);
        min_x = min_x.min(left.x);
        max_x = max_x.max(left.x);
        assert!(frame.missing.is_empty());
    }
    // The stride shows up as horizontal foot travel in profile.
    assert!(max_x - min_x > 30.0, "{min_x}..{max_x}");
}

#[test]
fn front_view_walk_steps_in_place() {
    let mut character = Character::new(RigConfig::default()).unwrap();
    character.set_locomotion(LocomotionState::Walk, 0.0);
    let rest_x = character.rig().rest_end("shin_l").unwrap().x;
    let ground = character.rig().ground_y();

    let mut highest = ground;
    for _ in 0..30 {
        let frame = character.advance(1.0 / 30.0);
        let ankle = frame.bone("shin_l").unwrap().end;
        assert!(approx(ankle.x, rest_x, 0.5), "{} vs {rest_x}", ankle.x);
        highest = highest.min(ankle.y);
    }
    assert!(ground - highest > 5.0);
}

#[test]
fn clip_channels_override_and_report_missing_bones() {
    let mut clip = AnimationClip::new("extras");
    clip.add_keyframe("tail.rotation", 0.0, Value::Float(0.3), Easing::Linear)
        .unwrap();
    clip.add_keyframe("opacity", 0.0, Value::Float(0.5), Easing::Linear)
        .unwrap();
    clip.add_keyframe("opacity", 1.0, Value::Float(1.0), Easing::Linear)
        .unwrap();
    clip.add_keyframe("head.rotation", 0.0, Value::Float(0.2), Easing::Linear)
        .unwrap();

    let mut character = Character::new(RigConfig::default()).unwrap();
    character.play_clip(Arc::new(clip), LoopMode::Once);
    let frame = character.advance(0.5);

    assert_eq!(frame.missing, vec!["tail".to_string()]);
    assert!(approx(frame.properties.scalar("opacity").unwrap(), 0.75, 1e-5));
    let head = character.skeleton().bone("head").unwrap();
    assert!(approx(head.local_rotation(), head.rest_rotation() + 0.2, 1e-5));
}

#[test]
fn talking_follows_cues_on_the_character_clock() {
    let json = marionette_test_fixtures::lipsync::json("hello").unwrap();
    let cues = Arc::new(LipSyncTrack::from_json(&json).unwrap());
    let mut character = Character::new(RigConfig::default()).unwrap();
    character.start_talking(Some(cues));

    character.advance(0.25);
    let frame = character.advance(0.25);
    assert_eq!(frame.mouth(), Some("F"));

    character.stop_talking();
    let frame = character.advance(0.1);
    assert_eq!(frame.mouth(), None);
}

#[test]
fn phrase_gesture_runs_to_completion() {
    let mut character = Character::new(RigConfig::default()).unwrap();
    let outcome = character.react_to_phrase("Hello everyone");
    assert!(matches!(outcome, Some(TriggerOutcome::Started(_))));

    let frame = character.advance(1.0);
    let arm = character.skeleton().bone("upper_arm_r").unwrap();
    assert!((arm.local_rotation() - arm.rest_rotation()).abs() > 1.0);
    assert!(frame.bone("hand_r").unwrap().end.y < character.rig().rest_end("hand_r").unwrap().y);

    character.advance(1.1);
    assert!(character.gestures().active().is_none());
    assert_eq!(character.react_to_phrase("plain words"), None);
}

#[test]
fn pointing_moves_the_hand_onto_its_target() {
    let mut character = Character::new(RigConfig::default()).unwrap();
    let target = Vec2::new(1.5, 1.0);
    character.trigger_gesture(Gesture::Point { target });
    let frame = character.advance(0.75);

    let unit = frame.unit;
    let shift = frame.bone("pelvis").unwrap().start - character.skeleton().origin();
    let rest = character.rig().rest_effector("hand_r").unwrap();
    let expected = rest + shift + Vec2::new(target.x * unit, -target.y * unit);
    let wrist = frame.bone("forearm_r").unwrap().end;
    assert!(wrist.distance(expected) < 0.5, "{wrist:?} vs {expected:?}");
}

#[test]
fn hair_hangs_from_the_crown() {
    let mut character = Character::new(RigConfig::default()).unwrap();
    let mut frame = character.advance(0.0);
    for _ in 0..30 {
        frame = character.advance(1.0 / 30.0);
    }
    assert_eq!(frame.chains.len(), 1);
    let hair = &frame.chains[0];
    assert_eq!(hair.len(), 6);
    let crown = frame.bone("head").unwrap().end;
    assert!(hair[0].distance(crown) < 5.0);
    assert!(hair[5].y > hair[0].y);
    assert_eq!(frame.chain_offsets.len(), 1);
    assert_eq!(frame.chain_offsets[0].len(), hair.len());

    let bald = RigConfig {
        hair_segments: 0,
        ..RigConfig::default()
    };
    let mut character = Character::new(bald).unwrap();
    assert!(character.advance(0.1).chains.is_empty());
}

#[test]
fn unknown_ik_effectors_are_reported_missing() {
    let mut clip = AnimationClip::new("reach");
    clip.add_keyframe("ik.tail_tip", 0.0, Value::Vec2([0.5, 0.5]), Easing::Linear)
        .unwrap();
    clip.add_keyframe("ik.hand_l", 0.0, Value::Vec2([0.0, 0.0]), Easing::Linear)
        .unwrap();

    let mut character = Character::new(RigConfig::default()).unwrap();
    character.play_clip(Arc::new(clip), LoopMode::Loop);
    let frame = character.advance(0.1);
    assert_eq!(frame.missing, vec!["tail_tip".to_string()]);
}
