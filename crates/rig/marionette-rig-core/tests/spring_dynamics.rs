use marionette_rig_core::{Spring, Spring2D, SpringParams, MAX_SUBSTEP};
use marionette_api_core::Vec2;

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

#[test]
fn at_or_above_critical_damping_never_overshoots() {
    for damping in [20.0, 40.0] {
        let params = SpringParams::new(100.0, damping);
        assert!(params.is_overdamped());
        let mut spring = Spring::new(0.0, params);
        spring.set_target(1.0);
        let mut previous = spring.value();
        for _ in 0..180 {
            spring.update(1.0 / 60.0);
            let v = spring.value();
            assert!(v <= 1.0, "overshoot with c={damping}: {v}");
            assert!(v >= previous, "reversed with c={damping}: {previous} -> {v}");
            previous = v;
        }
        assert!(previous > 0.99, "c={damping} ended at {previous}");
    }
}

#[test]
fn underdamped_crossings_match_closed_form() {
    let (k, c) = (100.0_f32, 2.0_f32);
    let horizon = 2.0_f32;

    // x(t) - target ~ e^(-zeta w t) (cos wd t + (zeta w / wd) sin wd t): zero
    // when wd t = pi - atan(wd / (zeta w)) + n pi.
    let zeta_w = c / 2.0;
    let wd = (k - zeta_w * zeta_w).sqrt();
    let first = (std::f32::consts::PI - (wd / zeta_w).atan()) / wd;
    let spacing = std::f32::consts::PI / wd;
    let expected = ((horizon - first) / spacing).floor() as usize + 1;
    assert_eq!(expected, 6);

    let mut spring = Spring::new(0.0, SpringParams::new(k, c));
    spring.set_target(1.0);
    let dt = 1.0 / 1000.0;
    let mut last_sign = -1.0_f32;
    let mut crossings = 0;
    for _ in 0..2000 {
        spring.update(dt);
        let d = spring.value() - 1.0;
        if d != 0.0 && d.signum() != last_sign {
            crossings += 1;
            last_sign = d.signum();
        }
    }
    assert_eq!(crossings, expected);
}

#[test]
fn long_ticks_are_sub_stepped() {
    let params = SpringParams::new(400.0, 40.0);
    let mut big = Spring::new(0.0, params);
    big.set_target(10.0);
    big.update(1.0);
    assert!(big.value().is_finite());
    approx(big.value(), 10.0, 0.01);

    // A 0.04 s tick runs as three equal sub-steps.
    let dt = 0.04_f32;
    assert!(dt > 2.0 * MAX_SUBSTEP && dt < 3.0 * MAX_SUBSTEP);
    let mut a = Spring::new(0.0, params);
    let mut b = Spring::new(0.0, params);
    a.set_target(1.0);
    b.set_target(1.0);
    a.update(dt);
    for _ in 0..3 {
        b.update(dt / 3.0);
    }
    approx(a.value(), b.value(), 1e-6);
    approx(a.velocity(), b.velocity(), 1e-5);
}

#[test]
fn very_long_ticks_integrate_all_of_their_time() {
    // Critically damped, omega = 0.2: x(t) = 1 - (1 + 0.2 t) e^(-0.2 t).
    let params = SpringParams::critical(0.04);
    let mut once = Spring::new(0.0, params);
    let mut split = Spring::new(0.0, params);
    once.set_target(1.0);
    split.set_target(1.0);
    once.update(40.0);
    for _ in 0..4 {
        split.update(10.0);
    }
    approx(once.value(), split.value(), 1e-4);
    let closed = 1.0 - 9.0 * (-8.0_f32).exp();
    approx(once.value(), closed, 5e-3);
}

#[test]
fn invalid_ticks_are_ignored() {
    let mut s = Spring::new(0.0, SpringParams::default());
    s.set_target(1.0);
    s.update(f32::NAN);
    s.update(-0.5);
    s.update(0.0);
    assert_eq!(s.value(), 0.0);
    assert_eq!(s.velocity(), 0.0);
}

#[test]
fn spring2d_settles_on_target() {
    let mut s = Spring2D::new(Vec2::ZERO, SpringParams::critical(150.0));
    s.set_target(Vec2::new(3.0, -4.0));
    assert!(!s.is_settled(1e-3));
    for _ in 0..240 {
        s.update(1.0 / 60.0);
    }
    assert!(s.is_settled(1e-2), "{:?}", s.value());
    s.snap_to(Vec2::new(1.0, 1.0));
    assert_eq!(s.velocity(), Vec2::ZERO);
    assert!(s.is_settled(0.0));
}
