use std::f32::consts::{FRAC_PI_2, PI};

use marionette_api_core::{Pose, Value, Vec2};
use marionette_rig_core::{BoneDef, RigError, Skeleton};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn approx_vec(a: Vec2, b: Vec2, eps: f32) {
    assert!(a.distance(b) <= eps, "left={a:?} right={b:?} eps={eps}");
}

fn two_links() -> Skeleton {
    let mut sk = Skeleton::new(Vec2::new(10.0, 10.0));
    sk.add_bone(BoneDef::root("root", 10.0, 0.0)).unwrap();
    sk.add_bone(BoneDef::child("tip", "root", 5.0, FRAC_PI_2)).unwrap();
    sk
}

#[test]
fn forward_kinematics_accumulates_rotations() {
    let mut sk = two_links();
    sk.solve_forward();
    approx_vec(sk.bone("root").unwrap().end(), Vec2::new(20.0, 10.0), 1e-5);
    approx_vec(sk.bone("tip").unwrap().end(), Vec2::new(20.0, 15.0), 1e-5);

    sk.set_local_rotation("root", FRAC_PI_2).unwrap();
    sk.solve_forward();
    approx_vec(sk.bone("root").unwrap().end(), Vec2::new(10.0, 20.0), 1e-5);
    let tip = sk.bone("tip").unwrap();
    approx(tip.rotation(), PI, 1e-6);
    approx_vec(tip.end(), Vec2::new(5.0, 20.0), 1e-5);
}

#[test]
fn offsets_are_expressed_in_the_parent_frame() {
    let mut sk = two_links();
    sk.set_local_rotation("root", FRAC_PI_2).unwrap();
    sk.set_offset("tip", Vec2::new(2.0, 0.0)).unwrap();
    sk.solve_forward();
    approx_vec(sk.bone("tip").unwrap().start(), Vec2::new(10.0, 22.0), 1e-5);

    sk.translate_root(Vec2::new(-10.0, 0.0));
    sk.solve_forward();
    approx_vec(sk.bone("root").unwrap().start(), Vec2::new(0.0, 10.0), 1e-5);

    sk.reset_to_rest();
    approx_vec(sk.bone("tip").unwrap().end(), Vec2::new(20.0, 15.0), 1e-5);
    assert_eq!(sk.bone("tip").unwrap().offset(), Vec2::ZERO);
}

#[test]
fn lookups_report_missing_bones() {
    let sk = two_links();
    assert_eq!(sk.bone_index("tip"), Ok(1));
    assert_eq!(
        sk.bone_index("tail").unwrap_err(),
        RigError::BoneNotFound("tail".into())
    );
    assert!(sk.bones().iter().all(|b| b.parent().map_or(true, |p| p < 1)));
}

#[test]
fn apply_pose_skips_missing_bones_and_applies_the_rest() {
    let mut sk = two_links();
    let mut pose = Pose::new();
    pose.set_rotation("root", 0.5);
    pose.set_offset("tip", Vec2::new(0.5, 0.0));
    pose.set_rotation("tail", 1.0);
    pose.set_offset("tail", Vec2::new(1.0, 1.0));
    pose.set_rotation("wing", 1.0);
    pose.insert("root.rotation_typo", Value::Float(9.0));
    pose.insert("opacity", Value::Float(0.5));
    pose.set_ik_target("hand_l", Vec2::new(1.0, 0.0));

    let missing = sk.apply_pose(&pose, 4.0);
    assert_eq!(missing, vec!["tail".to_string(), "wing".to_string()]);

    sk.solve_forward();
    let root = sk.bone("root").unwrap();
    approx(root.local_rotation(), 0.5, 1e-6);
    // Offsets are head units scaled to pixels.
    assert_eq!(sk.bone("tip").unwrap().offset(), Vec2::new(2.0, 0.0));
}

#[test]
fn wrong_channel_kinds_are_ignored() {
    let mut sk = two_links();
    let mut pose = Pose::new();
    pose.insert("root.rotation", Value::Vec2([1.0, 1.0]));
    pose.insert("tip.offset", Value::Float(3.0));
    assert!(sk.apply_pose(&pose, 1.0).is_empty());
    approx(sk.bone("root").unwrap().local_rotation(), 0.0, 1e-6);
    assert_eq!(sk.bone("tip").unwrap().offset(), Vec2::ZERO);
}
