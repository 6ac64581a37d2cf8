use marionette_motion_core::{
    GaitParams, Locomotion, LocomotionState, Motion, MotionBlender, MotionPreset,
};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

#[test]
fn crossfade_ramps_linearly() {
    let mut blender = MotionBlender::new();
    let idle = blender.add(MotionPreset::idle(), 1.0);
    let walk = blender.add(MotionPreset::walk(GaitParams::walk()), 0.0);
    assert!(blender.crossfade(idle, walk, 0.5));

    blender.advance(0.25);
    assert!(approx(blender.weight(idle).unwrap(), 0.5, 1e-5));
    assert!(approx(blender.weight(walk).unwrap(), 0.5, 1e-5));

    blender.advance(0.25);
    assert_eq!(blender.weight(idle), Some(0.0));
    assert_eq!(blender.weight(walk), Some(1.0));
    // Plain fades keep the layer around.
    assert!(blender.contains(idle));

    blender.advance(1.0);
    assert_eq!(blender.weight(walk), Some(1.0));
}

#[test]
fn set_weight_cancels_a_fade() {
    let mut blender = MotionBlender::new();
    let id = blender.add(MotionPreset::idle(), 0.0);
    blender.fade_to(id, 1.0, 1.0);
    blender.advance(0.5);
    assert!(blender.set_weight(id, 0.2));
    blender.advance(0.5);
    assert_eq!(blender.weight(id), Some(0.2));
    assert!(!blender.set_weight(id, f32::NAN));
}

#[test]
fn fade_out_removes_the_layer() {
    let mut blender = MotionBlender::new();
    let id = blender.add(MotionPreset::breathing(), 1.0);
    blender.fade_out(id, 0.3);
    blender.advance(0.15);
    assert!(blender.contains(id));
    blender.advance(0.2);
    assert!(!blender.contains(id));
    assert!(blender.is_empty());
}

#[test]
fn finished_one_shots_are_dropped() {
    let mut blender = MotionBlender::new();
    let idle = blender.add(MotionPreset::idle(), 1.0);
    let wave = blender.add(MotionPreset::wave(), 1.0);
    blender.advance(1.5);
    assert!(blender.contains(wave));
    assert!(blender.sample(1.5).contains("forearm_r.rotation"));
    blender.advance(1.0);
    assert!(!blender.contains(wave));
    assert!(blender.contains(idle));
    assert!(!blender.sample(2.5).contains("forearm_r.rotation"));
}

#[test]
fn one_shot_envelope_returns_to_rest() {
    let mut shrug = MotionPreset::shrug();
    assert_eq!(shrug.sample(0.0).rotation("head"), Some(0.0));
    shrug.advance(0.6);
    assert!(shrug.sample(0.6).rotation("head").unwrap() > 0.0);
    shrug.advance(0.6);
    assert!(shrug.is_finished());
    assert_eq!(shrug.sample(1.2).rotation("head"), Some(0.0));
}

#[test]
fn locomotion_crossfades_between_states() {
    let mut blender = MotionBlender::new();
    let mut loco = Locomotion::new(&mut blender, GaitParams::walk(), GaitParams::run());
    loco.set_state(&mut blender, LocomotionState::Walk, 0.4);
    blender.advance(0.2);
    let idle = loco.layer(LocomotionState::Idle);
    let walk = loco.layer(LocomotionState::Walk);
    assert!(approx(blender.weight(idle).unwrap(), 0.5, 1e-5));
    assert!(approx(blender.weight(walk).unwrap(), 0.5, 1e-5));

    // Switch again mid-fade: walk heads back down from where it is.
    loco.set_state(&mut blender, LocomotionState::Run, 0.4);
    blender.advance(0.4);
    assert_eq!(blender.weight(idle), Some(0.0));
    assert_eq!(blender.weight(walk), Some(0.0));
    assert_eq!(blender.weight(loco.layer(LocomotionState::Run)), Some(1.0));
    assert_eq!(loco.state(), LocomotionState::Run);
}

#[test]
fn idle_and_breathing_start_at_rest() {
    for preset in [MotionPreset::idle(), MotionPreset::breathing()] {
        let pose = preset.sample(0.0);
        for (key, value) in pose.iter() {
            if let Some(x) = value.as_float() {
                assert!(approx(x, 0.0, 1e-6), "{key}");
            }
            if let Some(v) = value.as_vec2() {
                assert!(v.length() < 1e-6, "{key}");
            }
        }
    }
}
