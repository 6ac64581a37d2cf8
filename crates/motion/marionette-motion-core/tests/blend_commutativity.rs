use marionette_motion_core::{Motion, MotionBlender, MotionPreset, Pose};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn assert_poses_match(a: &Pose, b: &Pose) {
    assert_eq!(a.len(), b.len());
    for (key, va) in a.iter() {
        let vb = b.get(key).unwrap_or_else(|| panic!("missing {key}"));
        match (va.as_float(), va.as_vec2()) {
            (Some(x), _) => assert!(approx(x, vb.as_float().unwrap(), 1e-5), "{key}"),
            (_, Some(v)) => {
                let w = vb.as_vec2().unwrap();
                assert!(approx(v.x, w.x, 1e-5) && approx(v.y, w.y, 1e-5), "{key}");
            }
            _ => assert_eq!(va, vb, "{key}"),
        }
    }
}

fn layered(order: &[usize]) -> MotionBlender {
    let mut blender = MotionBlender::new();
    for &i in order {
        match i {
            0 => blender.add(MotionPreset::idle(), 0.6),
            1 => blender.add(MotionPreset::breathing(), 0.4),
            2 => blender.add(MotionPreset::wave(), 0.5),
            _ => blender.add(MotionPreset::talking(None), 0.3),
        };
    }
    blender
}

#[test]
fn layer_order_does_not_change_the_result() {
    let mut forward = layered(&[0, 1, 2, 3]);
    let mut reverse = layered(&[3, 2, 1, 0]);
    for _ in 0..20 {
        forward.advance(1.0 / 30.0);
        reverse.advance(1.0 / 30.0);
    }
    let a = forward.sample(0.7);
    let b = reverse.sample(0.7);
    assert!(a.contains("head.rotation"));
    assert!(a.contains("mouth"));
    assert_poses_match(&a, &b);
}

#[test]
fn weights_scale_without_normalizing() {
    let mut single = MotionBlender::new();
    single.add(MotionPreset::idle(), 1.0);
    let mut doubled = MotionBlender::new();
    doubled.add(MotionPreset::idle(), 2.0);
    single.advance(0.5);
    doubled.advance(0.5);

    let one = single.sample(0.5).rotation("spine").unwrap();
    let two = doubled.sample(0.5).rotation("spine").unwrap();
    assert!(one.abs() > 1e-4);
    assert!(approx(two, 2.0 * one, 1e-6));
}

#[test]
fn zero_weight_layers_contribute_nothing() {
    let mut blender = MotionBlender::new();
    blender.add(MotionPreset::idle(), 0.0);
    blender.advance(1.0);
    assert!(blender.sample(1.0).is_empty());

    let mut idle = MotionPreset::idle();
    idle.advance(1.0);
    assert!(idle.sample(1.0).rotation("spine").unwrap().abs() > 1e-4);
}

#[test]
fn blend_is_the_weighted_sum_in_either_order() {
    let mut a = MotionPreset::idle();
    let mut b = MotionPreset::wave();
    a.advance(0.5);
    b.advance(0.5);
    let (pa, pb) = (a.sample(0.5), b.sample(0.5));

    let mut ab = MotionBlender::new();
    ab.add(MotionPreset::idle(), 0.3);
    ab.add(MotionPreset::wave(), 0.7);
    let mut ba = MotionBlender::new();
    ba.add(MotionPreset::wave(), 0.7);
    ba.add(MotionPreset::idle(), 0.3);
    ab.advance(0.5);
    ba.advance(0.5);
    let blended = ab.sample(0.5);
    assert_poses_match(&blended, &ba.sample(0.5));

    let mut checked = 0;
    for (key, value) in blended.iter() {
        if let Some(x) = value.as_float() {
            let expected = 0.3 * pa.scalar(key).unwrap_or(0.0) + 0.7 * pb.scalar(key).unwrap_or(0.0);
            assert!(approx(x, expected, 1e-5), "{key}: {x} vs {expected}");
            checked += 1;
        }
    }
    assert!(blended.contains("spine.rotation"));
    assert!(checked > 1);
}
