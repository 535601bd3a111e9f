//! Property tests for component relations.

use gh_components::{
    CanopyConvectionConfig, CanopyFreeConvection, HeatPump, HeatPumpConfig, Input, ScreenCrack,
    ScreenCrackConfig,
};
use gh_network::ConnectionGraph;
use proptest::prelude::*;

proptest! {
    #[test]
    fn convection_is_antisymmetric(
        lai in 0.0..6.0_f64,
        t_a in 270.0..320.0_f64,
        t_b in 270.0..320.0_f64,
    ) {
        let mut net = ConnectionGraph::new();
        let mut c = CanopyFreeConvection::new(
            "canopy",
            &CanopyConvectionConfig { area: 50.0, u: 5.0, lai: Input::default() },
            &mut net,
        )
        .unwrap();
        let forward = c.update(lai, t_a, t_b);
        let backward = c.update(lai, t_b, t_a);
        prop_assert!((forward + backward).abs() < 1e-9);
        if t_b > t_a && lai > 0.0 {
            prop_assert!(forward > 0.0);
        }
    }

    #[test]
    fn heat_pump_balances_energy(
        t_c in 270.0..300.0_f64,
        lift in 0.0..60.0_f64,
        dt in 0.1..600.0_f64,
        on in any::<bool>(),
    ) {
        let mut net = ConnectionGraph::new();
        let mut hp = HeatPump::new(
            "hp",
            &HeatPumpConfig {
                q_nominal: 8000.0,
                tau: 90.0,
                t_max: 373.15,
                carnot_efficiency: 0.5,
                y_start: 0.5,
                on: Input::default(),
            },
            &mut net,
        )
        .unwrap();
        let s = hp.update(on, t_c + lift, t_c, dt).unwrap();
        prop_assert!(s.cop.is_finite() && s.cop > 0.0);
        prop_assert!((0.0..=1.0).contains(&s.y));
        prop_assert!((s.q_source() + s.w_dot - s.q_dot).abs() < 1e-6);
    }

    #[test]
    fn screen_crack_latch(commands in proptest::collection::vec(any::<bool>(), 1..40)) {
        let mut sc = ScreenCrack::new(
            "sc",
            &ScreenCrackConfig { sc_value: 0.04, command: Input::default() },
        )
        .unwrap();
        let mut last_rise = None;
        let mut prev = false;
        for (i, &u) in commands.iter().enumerate() {
            let t = i as f64 * 10.0;
            let aperture = sc.update(u, t);
            if u && !prev {
                last_rise = Some(t);
            }
            prev = u;
            prop_assert_eq!(aperture, if u { 0.04 } else { 0.0 });
            prop_assert_eq!(sc.entry_time(), last_rise);
        }
    }
}
