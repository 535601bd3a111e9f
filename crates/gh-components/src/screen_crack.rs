//! Screen crack opening as a timed latch.

use gh_core::PortId;
use gh_network::ConnectionGraph;
use gh_sim::{Clock, require_non_negative};
use serde::{Deserialize, Serialize};

use crate::error::ComponentResult;
use crate::input::Input;
use crate::traits::{Component, Outputs};

fn default_sc_value() -> f64 {
    0.03
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenCrackConfig {
    /// Aperture while the crack is open.
    #[serde(default = "default_sc_value")]
    pub sc_value: f64,
    /// Open command.
    #[serde(default)]
    pub command: Input,
}

/// Gates a fixed screen aperture on a boolean command, no hysteresis.
#[derive(Debug, Clone)]
pub struct ScreenCrack {
    name: String,
    sc_value: f64,
    command: Input,
    on: bool,
    aperture: f64,
    entry_time: Option<f64>,
}

impl ScreenCrack {
    pub fn new(name: impl Into<String>, config: &ScreenCrackConfig) -> ComponentResult<Self> {
        require_non_negative(config.sc_value, "sc_value must be >= 0")?;
        config.command.validate()?;
        Ok(Self {
            name: name.into(),
            sc_value: config.sc_value,
            command: config.command.clone(),
            on: false,
            aperture: 0.0,
            entry_time: None,
        })
    }

    pub fn update(&mut self, u: bool, t: f64) -> f64 {
        if u && !self.on {
            self.entry_time = Some(t);
        }
        self.on = u;
        self.aperture = if u { self.sc_value } else { 0.0 };
        self.aperture
    }

    pub fn aperture(&self) -> f64 {
        self.aperture
    }

    /// Time the command last switched on.
    pub fn entry_time(&self) -> Option<f64> {
        self.entry_time
    }
}

impl Component for ScreenCrack {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<(String, PortId)> {
        Vec::new()
    }

    fn contribute(&mut self, _net: &mut ConnectionGraph, clock: Clock) -> ComponentResult<()> {
        self.update(self.command.is_on(clock.t), clock.t);
        Ok(())
    }

    fn outputs(&self) -> Outputs {
        let out = Outputs::new().scalar("SC", self.aperture);
        match self.entry_time {
            Some(t) => out.scalar("entry_time", t),
            None => out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_records_rising_edge() {
        let mut sc = ScreenCrack::new("sc", &ScreenCrackConfig {
            sc_value: 0.05,
            command: Input::default(),
        })
        .unwrap();
        assert_eq!(sc.update(false, 0.0), 0.0);
        assert_eq!(sc.entry_time(), None);
        assert_eq!(sc.update(true, 10.0), 0.05);
        assert_eq!(sc.update(true, 20.0), 0.05);
        assert_eq!(sc.entry_time(), Some(10.0));
        assert_eq!(sc.update(false, 30.0), 0.0);
        assert_eq!(sc.entry_time(), Some(10.0));
        sc.update(true, 40.0);
        assert_eq!(sc.entry_time(), Some(40.0));
    }

    #[test]
    fn gate_ignores_entry_time() {
        let mut sc = ScreenCrack::new("sc", &ScreenCrackConfig {
            sc_value: 0.6,
            command: Input::default(),
        })
        .unwrap();
        for (u, t) in [(true, 0.0), (false, 5.0), (false, 6.0), (true, 7.0), (true, 100.0)] {
            assert_eq!(sc.update(u, t), if u { 0.6 } else { 0.0 });
        }
    }

    #[test]
    fn follows_command_schedule() {
        let mut sc = ScreenCrack::new("sc", &ScreenCrackConfig {
            sc_value: 0.03,
            command: Input::Steps(vec![(0.0, 0.0), (5.0, 1.0)]),
        })
        .unwrap();
        let mut net = ConnectionGraph::new();
        let mut clock = Clock::new(5.0);
        sc.contribute(&mut net, clock).unwrap();
        assert_eq!(sc.aperture(), 0.0);
        clock.advance();
        sc.contribute(&mut net, clock).unwrap();
        assert_eq!(sc.outputs().get_scalar("entry_time"), Some(5.0));
        assert!(sc.port("port").is_err());
    }
}
