use std::sync::Arc;

use marionette_animation_core::LipSyncTrack;
use marionette_motion_core::{Motion, MotionBlender, MotionPreset};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn hello_track() -> Arc<LipSyncTrack> {
    let json = marionette_test_fixtures::lipsync::json("hello").expect("fixture");
    Arc::new(LipSyncTrack::from_json(&json).expect("valid cues"))
}

#[test]
fn mouth_follows_cues_at_the_character_time() {
    let talking = MotionPreset::talking(Some(hello_track()));
    let pose = talking.sample(0.15);
    assert_eq!(pose.get("mouth").and_then(|v| v.as_text()), Some("C"));
    assert!(approx(pose.scalar("jaw_open").unwrap(), 0.6, 1e-6));

    let pose = talking.sample(0.5);
    assert_eq!(pose.get("mouth").and_then(|v| v.as_text()), Some("F"));

    // Past the last cue the mouth rests.
    let pose = talking.sample(5.0);
    assert_eq!(pose.get("mouth").and_then(|v| v.as_text()), Some("X"));
    assert_eq!(pose.scalar("jaw_open"), Some(0.0));
    assert_eq!(pose.rotation("head"), Some(0.0));
}

#[test]
fn cues_pass_through_the_blender() {
    let mut blender = MotionBlender::new();
    blender.add(MotionPreset::idle(), 1.0);
    blender.add(MotionPreset::talking(Some(hello_track())), 1.0);
    blender.advance(0.8);
    let pose = blender.sample(0.8);
    assert_eq!(pose.get("mouth").and_then(|v| v.as_text()), Some("D"));
    assert!(approx(pose.scalar("jaw_open").unwrap(), 1.0, 1e-6));
}

#[test]
fn chatter_without_cues_moves_the_jaw() {
    let mut talking = MotionPreset::talking(None);
    let mut opened = false;
    for i in 0..60 {
        talking.advance(1.0 / 60.0);
        let jaw = talking.sample(i as f32 / 60.0).scalar("jaw_open").unwrap();
        assert!((0.0..=1.0).contains(&jaw));
        opened |= jaw > 0.0;
    }
    assert!(opened);
}
