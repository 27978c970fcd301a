use proptest::prelude::*;
use survive_and_poop::needs::{GAUGE_MAX, Gauge, GaugeLevel, Needs};

#[test]
fn default_rates_fill_hunger_first() {
    let mut needs = Needs::new(0.25, 0.5);
    // 200 updates at 0.5 fill hunger exactly.
    for _ in 0..200 {
        needs.tick();
    }
    assert!(needs.hunger.is_maxed());
    assert!((needs.fecal_urgency.fraction() - 0.5).abs() < 1e-4);
    assert_eq!(needs.fecal_urgency.level(), GaugeLevel::Rising);
}

#[test]
fn set_is_clamped() {
    let mut g = Gauge::new("hunger", GAUGE_MAX, 0.5);
    g.set(250.0);
    assert_eq!(g.value(), GAUGE_MAX);
    g.set(-3.0);
    assert_eq!(g.value(), 0.0);
}

proptest! {
    #[test]
    fn gauge_stays_in_range(rate in -5.0f32..5.0, ticks in 0usize..2_000) {
        let mut g = Gauge::new("x", GAUGE_MAX, rate);
        for _ in 0..ticks {
            let v = g.tick();
            prop_assert!((0.0..=GAUGE_MAX).contains(&v));
        }
        prop_assert!((0.0..=1.0).contains(&g.fraction()));
    }

    #[test]
    fn positive_rate_never_decreases(rate in 0.0f32..5.0, ticks in 1usize..500) {
        let mut g = Gauge::new("x", GAUGE_MAX, rate);
        let mut prev = g.value();
        for _ in 0..ticks {
            let v = g.tick();
            prop_assert!(v >= prev);
            prev = v;
        }
    }
}
