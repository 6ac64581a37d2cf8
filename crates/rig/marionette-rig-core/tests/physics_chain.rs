use marionette_api_core::Vec2;
use marionette_rig_core::{ChainParams, PhysicsChain};

#[test]
fn chain_at_rest_stays_at_rest() {
    let mut chain = PhysicsChain::new(Vec2::new(50.0, 20.0), 4, ChainParams::default());
    let before = chain.positions();
    assert_eq!(before[3], Vec2::new(50.0, 50.0));
    for _ in 0..30 {
        chain.update(1.0 / 60.0);
    }
    for (a, b) in before.iter().zip(chain.positions()) {
        assert!(a.distance(b) < 1e-4, "{a:?} vs {b:?}");
    }
    assert!(chain.offsets().iter().all(|o| o.length() < 1e-4));
}

#[test]
fn nodes_trail_a_moving_anchor_and_settle() {
    let mut chain = PhysicsChain::new(Vec2::ZERO, 3, ChainParams::default());
    chain.set_anchor(Vec2::new(20.0, 0.0));
    chain.update(1.0 / 60.0);
    let offsets = chain.offsets();
    // Everything lags behind (to the left of) where it would hang.
    assert!(offsets.iter().all(|o| o.x < 0.0), "{offsets:?}");

    for _ in 0..600 {
        chain.update(1.0 / 60.0);
    }
    assert!(
        chain.offsets().iter().all(|o| o.length() < 0.05),
        "{:?}",
        chain.offsets()
    );
}

#[test]
fn links_never_exceed_max_stretch() {
    let params = ChainParams {
        max_stretch: 1.2,
        ..ChainParams::default()
    };
    let limit = params.segment_length * params.max_stretch;
    let mut chain = PhysicsChain::new(Vec2::ZERO, 5, params);
    chain.set_anchor(Vec2::new(0.0, -500.0));
    for _ in 0..10 {
        chain.update(1.0 / 30.0);
        let p = chain.positions();
        for pair in p.windows(2) {
            assert!(pair[0].distance(pair[1]) <= limit + 1e-3);
        }
    }
}

#[test]
fn wind_bends_the_rest_shape() {
    let mut chain = PhysicsChain::new(Vec2::ZERO, 4, ChainParams::default());
    chain.set_wind(Vec2::new(3.0, 0.0));
    for _ in 0..600 {
        chain.update(1.0 / 60.0);
    }
    let tip = *chain.positions().last().unwrap();
    assert!(tip.x > 10.0, "{tip:?}");
    chain.reset();
    assert!(chain.offsets().iter().all(|o| o.length() < 1e-6));
}
