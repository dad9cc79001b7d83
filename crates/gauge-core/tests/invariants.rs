// ─────────────────────────────────────────────────────────────────────
// Gauge Kernel — Randomized Invariants
// ─────────────────────────────────────────────────────────────────────
//! Property tests over randomized momentum stacks and limit gauges:
//!
//! - determination times are strictly increasing
//! - once in range, every vertex stays inside the limit band
//! - the persistence seam round-trips the determination exactly
//! - `forget_past` preserves the future trajectory

use gauge_core::{Gauge, GaugeState};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `(-far ~ -near) <= g <= (near ~ far)` with momenta on all three.
fn random_gauge1(rng: &mut StdRng, far: f64, near: f64, until: i64) -> Gauge {
    let g_max = Gauge::new(rng.gen_range(near..far), far, near, Some(0.0));
    let g_min = Gauge::new(rng.gen_range(-far..-near), -near, -far, Some(0.0));
    let value = rng.gen_range(-far..far);
    let g = Gauge::new(value, &g_max, &g_min, Some(0.0));
    for x in (0..until).step_by(5) {
        let velocity = rng.gen_range(-far..far);
        g_max.add_momentum(velocity, Some(x as f64), Some((x + 5) as f64)).unwrap();
    }
    for x in (0..until).step_by(2) {
        let velocity = rng.gen_range(-far..far);
        g.add_momentum(velocity, Some(x as f64), Some((x + 2) as f64)).unwrap();
    }
    for x in 0..until {
        let velocity = rng.gen_range(-far..far);
        g_min.add_momentum(velocity, Some(x as f64), Some((x + 1) as f64)).unwrap();
    }
    g
}

/// `0 <= g <= (near ~ far)` with a constant floor.
fn random_gauge2(rng: &mut StdRng, far: f64, near: f64, until: i64) -> Gauge {
    let g_max = Gauge::new(rng.gen_range(near..far), far, near, Some(0.0));
    let value = rng.gen_range(0.0..g_max.value_at(Some(0.0)));
    let g = Gauge::new(value, &g_max, 0.0, Some(0.0));
    for x in (0..until).step_by(5) {
        let velocity = rng.gen_range(-far..far);
        g_max.add_momentum(velocity, Some(x as f64), Some((x + 5) as f64)).unwrap();
    }
    for x in (0..until).step_by(2) {
        let velocity = rng.gen_range(-far..far);
        g.add_momentum(velocity, Some(x as f64), Some((x + 2) as f64)).unwrap();
    }
    g
}

/// Every vertex after the gauge first enters its band stays within the
/// band, both as stored and as queried.
fn assert_all_in_range(g: &Gauge) {
    let mut outbound = true;
    for vertex in g.determination().vertices().iter() {
        for value in [vertex.value, g.value_at(Some(vertex.time))] {
            let min = g.get_min(Some(vertex.time));
            let max = g.get_max(Some(vertex.time));
            if min <= value && value <= max {
                outbound = false;
                continue;
            }
            assert!(
                outbound,
                "out of range at t={}: !({min} <= {value} <= {max})",
                vertex.time
            );
        }
    }
}

fn assert_times_increase(g: &Gauge) {
    let determination = g.determination();
    for pair in determination.vertices().windows(2) {
        assert!(
            pair[0].time < pair[1].time,
            "non-increasing vertex times: {} then {}",
            pair[0].time,
            pair[1].time
        );
    }
}

fn assert_round_trip(g: &Gauge) {
    let state: GaugeState = g.state();
    let restored = Gauge::restore(&state).unwrap();
    assert_eq!(
        g.determination().vertices(),
        restored.determination().vertices()
    );
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64, .. ProptestConfig::default()
    })]

    #[test]
    fn bidirectional_hypergauge_stays_in_range(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let g = random_gauge1(&mut rng, 10.0, 3.0, 20);
        assert_all_in_range(&g);
        assert_times_increase(&g);
        assert_round_trip(&g);
    }

    #[test]
    fn wide_hypergauge_stays_in_range(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let g = random_gauge1(&mut rng, 1000.0, 3.0, 20);
        assert_all_in_range(&g);
        assert_times_increase(&g);
    }

    #[test]
    fn narrow_band_stays_in_range(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let g = random_gauge1(&mut rng, 10.0, 1e-10, 20);
        assert_all_in_range(&g);
        assert_times_increase(&g);
    }

    #[test]
    fn single_sided_hypergauge_stays_in_range(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let g = random_gauge2(&mut rng, 1e4, 1.0, 20);
        assert_all_in_range(&g);
        assert_times_increase(&g);
        assert_round_trip(&g);
    }

    #[test]
    fn forget_past_preserves_the_future(seed in any::<u64>(), cut in 0.0f64..15.0) {
        let mut rng = StdRng::seed_from_u64(seed);
        let g = Gauge::new(rng.gen_range(0.0..50.0), 100.0, 0.0, Some(0.0));
        for x in 0..10 {
            let since = x as f64;
            let velocity = rng.gen_range(-5.0..5.0);
            g.add_momentum(velocity, Some(since), Some(since + rng.gen_range(1.0..4.0))).unwrap();
        }
        let samples: Vec<f64> = (0..40).map(|x| cut + x as f64 * 0.5).collect();
        let before: Vec<f64> = samples.iter().map(|at| g.value_at(Some(*at))).collect();
        g.forget_past(None, Some(cut)).unwrap();
        for (at, expected) in samples.iter().zip(before) {
            let after = g.value_at(Some(*at));
            prop_assert!(
                (after - expected).abs() <= 1e-6 * expected.abs().max(1.0),
                "value changed across forget_past at t={at}: {expected} -> {after}"
            );
        }
    }
}

// fixed-seed regression corpus, mirroring the randomized shapes above
#[test]
fn repaired_random_gauges() {
    for seed in [
        1_098_651_790_867_685_487_u64,
        957_826_144_573_409_526,
        7_276_062_123_994_486_117,
        2_881_266_403_492_433_952,
        3_373_542_927_760_325_757,
        7_588_425_536_572_564_538,
    ] {
        let mut rng = StdRng::seed_from_u64(seed);
        let g = random_gauge1(&mut rng, 10.0, 3.0, 20);
        assert_all_in_range(&g);
        let mut rng = StdRng::seed_from_u64(seed);
        let g = random_gauge2(&mut rng, 1e4, 1.0, 20);
        assert_all_in_range(&g);
    }
}
