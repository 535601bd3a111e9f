//! Heat pump with first-order capacity ramp and Carnot-style COP.

use gh_core::PortId;
use gh_core::units::{Power, Temperature, k, w};
use gh_network::{ConnectionGraph, PortDomain};
use gh_sim::{Clock, FirstOrderLag, require_non_negative, require_positive};
use serde::{Deserialize, Serialize};

use crate::common::{DEFAULT_PORT_TEMPERATURE, EPSILON_LIFT, qualified};
use crate::error::{ComponentError, ComponentResult};
use crate::input::Input;
use crate::traits::{Component, Outputs};

fn default_tau() -> f64 {
    60.0
}

fn default_t_max() -> f64 {
    373.15
}

fn default_carnot_efficiency() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatPumpConfig {
    /// Condenser heat flow at full capacity (W).
    pub q_nominal: f64,
    /// Ramp time constant (s).
    #[serde(default = "default_tau")]
    pub tau: f64,
    /// Condenser temperature at which the unit trips (K).
    #[serde(default = "default_t_max")]
    pub t_max: f64,
    /// Fraction of the reversed-Carnot COP that is achieved.
    #[serde(default = "default_carnot_efficiency")]
    pub carnot_efficiency: f64,
    /// Initial capacity fraction.
    #[serde(default)]
    pub y_start: f64,
    /// On/off command.
    #[serde(default)]
    pub on: Input,
}

/// Result of one [`HeatPump::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPumpState {
    pub y: f64,
    pub cop: f64,
    /// Heat delivered at the condenser (W).
    pub q_dot: f64,
    /// Electrical power (W).
    pub w_dot: f64,
}

impl HeatPumpState {
    /// Heat taken from the source side (W).
    pub fn q_source(&self) -> f64 {
        self.q_dot - self.w_dot
    }
}

/// Heat pump between a source (`cold`) and a condenser (`hot`) heat port.
#[derive(Debug, Clone)]
pub struct HeatPump {
    name: String,
    q_nominal: Power,
    t_max: Temperature,
    carnot_efficiency: f64,
    lag: FirstOrderLag,
    on: Input,
    y: f64,
    last: HeatPumpState,
    hot: PortId,
    cold: PortId,
}

impl HeatPump {
    pub fn new(
        name: impl Into<String>,
        config: &HeatPumpConfig,
        net: &mut ConnectionGraph,
    ) -> ComponentResult<Self> {
        let name = name.into();
        require_non_negative(config.q_nominal, "q_nominal must be >= 0")?;
        require_positive(config.t_max, "t_max must be positive (K)")?;
        require_positive(config.carnot_efficiency, "carnot_efficiency must be positive")?;
        if !(0.0..=1.0).contains(&config.y_start) {
            return Err(ComponentError::InvalidConfiguration {
                what: "y_start must lie in [0, 1]",
            });
        }
        config.on.validate()?;
        let lag = FirstOrderLag::new(config.tau)?;

        let hot = net.add_port(qualified(&name, "hot"), PortDomain::Heat, DEFAULT_PORT_TEMPERATURE);
        let cold = net.add_port(qualified(&name, "cold"), PortDomain::Heat, DEFAULT_PORT_TEMPERATURE);
        Ok(Self {
            name,
            q_nominal: w(config.q_nominal),
            t_max: k(config.t_max),
            carnot_efficiency: config.carnot_efficiency,
            lag,
            on: config.on.clone(),
            y: config.y_start,
            // nothing is delivered before the first update
            last: HeatPumpState {
                y: config.y_start,
                cop: 0.0,
                q_dot: 0.0,
                w_dot: 0.0,
            },
            hot,
            cold,
        })
    }

    /// Capacity fraction `first_order_y`.
    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn last(&self) -> HeatPumpState {
        self.last
    }

    /// Advance the capacity ramp by `dt` and evaluate the heat flows.
    ///
    /// Fails with [`ComponentError::SafetyTrip`] when `t_h >= t_max`; the
    /// state is left untouched in that case.
    pub fn update(
        &mut self,
        on_off: bool,
        t_h: f64,
        t_c: f64,
        dt: f64,
    ) -> ComponentResult<HeatPumpState> {
        let t_max = self.t_max.value;
        if t_h >= t_max {
            return Err(ComponentError::SafetyTrip {
                what: "condenser temperature",
                value: t_h,
                limit: t_max,
            });
        }
        let target = if on_off { 1.0 } else { 0.0 };
        self.y = self.lag.step(self.y, target, dt);

        let cop = self.carnot_efficiency * t_h / (t_h - t_c).max(EPSILON_LIFT);
        let q_dot = self.y * self.q_nominal.value;
        let w_dot = if cop > 0.0 { q_dot / cop } else { 0.0 };
        self.last = HeatPumpState {
            y: self.y,
            cop,
            q_dot,
            w_dot,
        };
        Ok(self.last)
    }
}

impl Component for HeatPump {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<(String, PortId)> {
        vec![("hot".into(), self.hot), ("cold".into(), self.cold)]
    }

    fn contribute(&mut self, net: &mut ConnectionGraph, clock: Clock) -> ComponentResult<()> {
        let t_h = net.potential(self.hot)?;
        let t_c = net.potential(self.cold)?;
        let state = self.update(self.on.is_on(clock.t), t_h, t_c, clock.dt)?;
        net.submit_flow(self.hot, -state.q_dot)?;
        net.submit_flow(self.cold, state.q_source())?;
        Ok(())
    }

    fn outputs(&self) -> Outputs {
        Outputs::new()
            .scalar("y", self.last.y)
            .scalar("COP", self.last.cop)
            .scalar("Qdot", self.last.q_dot)
            .scalar("Wdot", self.last.w_dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pump(net: &mut ConnectionGraph) -> HeatPump {
        HeatPump::new(
            "hp",
            &HeatPumpConfig {
                q_nominal: 10_000.0,
                tau: 60.0,
                t_max: default_t_max(),
                carnot_efficiency: 0.5,
                y_start: 0.0,
                on: Input::from(true),
            },
            net,
        )
        .unwrap()
    }

    #[test]
    fn initial_outputs_are_consistent() {
        let mut net = ConnectionGraph::new();
        let hp = HeatPump::new(
            "hp",
            &HeatPumpConfig {
                q_nominal: 10_000.0,
                tau: 60.0,
                t_max: default_t_max(),
                carnot_efficiency: 0.5,
                y_start: 0.7,
                on: Input::from(true),
            },
            &mut net,
        )
        .unwrap();
        let s = hp.last();
        assert_eq!(s.y, 0.7);
        assert_eq!((s.q_dot, s.w_dot, s.cop), (0.0, 0.0, 0.0));
        assert_eq!(s.q_source(), 0.0);
        let out = hp.outputs();
        assert_eq!(out.get_scalar("Qdot"), Some(0.0));
        assert_eq!(out.get_scalar("y"), Some(0.7));
    }

    #[test]
    fn safety_trip_leaves_state_untouched() {
        let mut net = ConnectionGraph::new();
        let mut hp = pump(&mut net);
        hp.update(true, 320.0, 280.0, 30.0).unwrap();
        let y_before = hp.y();
        let err = hp.update(true, 373.15, 280.0, 30.0).unwrap_err();
        assert!(matches!(err, ComponentError::SafetyTrip { .. }));
        assert_eq!(hp.y(), y_before);
    }

    #[test]
    fn lag_approaches_full_capacity_monotonically() {
        let mut net = ConnectionGraph::new();
        let mut hp = pump(&mut net);
        let mut prev = hp.y();
        for _ in 0..500 {
            let s = hp.update(true, 318.15, 288.15, 5.0).unwrap();
            assert!(s.y >= prev);
            assert!(s.y <= 1.0);
            prev = s.y;
        }
        assert!((prev - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_lift_is_finite() {
        let mut net = ConnectionGraph::new();
        let mut hp = pump(&mut net);
        let s = hp.update(true, 300.0, 300.0, 60.0).unwrap();
        assert!(s.cop.is_finite());
        assert!(s.cop > 1e6);
        assert!(s.w_dot.is_finite());
    }

    #[test]
    fn ramp_and_energy_balance() {
        let mut net = ConnectionGraph::new();
        let mut hp = pump(&mut net);
        let s = hp.update(true, 323.15, 283.15, 60.0).unwrap();
        let expected_y = 1.0 - (-1.0_f64).exp();
        assert!((s.y - expected_y).abs() < 1e-12);
        assert!((s.cop - 0.5 * 323.15 / 40.0).abs() < 1e-12);
        assert!((s.q_dot - expected_y * 10_000.0).abs() < 1e-9);
        assert!((s.q_source() + s.w_dot - s.q_dot).abs() < 1e-9);

        let off = hp.update(false, 323.15, 283.15, 1e6).unwrap();
        assert!(off.y >= 0.0);
        assert!(off.q_dot < 1e-6);
    }

    #[test]
    fn contribute_reads_port_temperatures() {
        let mut net = ConnectionGraph::new();
        let mut hp = pump(&mut net);
        let sink = net.add_port("sink", PortDomain::Heat, 318.15);
        let source = net.add_port("source", PortDomain::Heat, 283.15);
        net.connect(hp.port("hot").unwrap(), sink).unwrap();
        net.connect(hp.port("cold").unwrap(), source).unwrap();

        let clock = Clock::new(10.0);
        net.begin_step();
        net.drive_potential(sink, 318.15).unwrap();
        net.drive_potential(source, 283.15).unwrap();
        net.resolve_all().unwrap();
        hp.contribute(&mut net, clock).unwrap();
        net.resolve_all().unwrap();

        let s = hp.last();
        assert!((net.flow(sink).unwrap() - s.q_dot).abs() < 1e-9);
        assert!((net.flow(source).unwrap() + s.q_source()).abs() < 1e-9);
        assert!((s.cop - 0.5 * 318.15 / 35.0).abs() < 1e-9);
    }
}
