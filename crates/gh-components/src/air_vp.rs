//! Vapour pressure state of an air volume.

use gh_core::PortId;
use gh_network::{ConnectionGraph, PortDomain};
use gh_sim::{Clock, require_non_negative};
use serde::{Deserialize, Serialize};

use crate::common::qualified;
use crate::error::ComponentResult;
use crate::input::Input;
use crate::traits::{Component, Outputs};

fn default_vp_start() -> f64 {
    1_000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirVpConfig {
    /// Initial vapour pressure (Pa).
    #[serde(default = "default_vp_start")]
    pub vp_start: f64,
    /// Hold `vp_start` for the whole run.
    #[serde(default)]
    pub steady_state: bool,
    /// Driving vapour pressure (Pa).
    #[serde(default)]
    pub input: Option<Input>,
}

/// Air vapour pressure that follows its driving input instantly.
///
/// This is a placeholder for a capacitive vapour balance: no moisture
/// storage is integrated.
#[derive(Debug, Clone)]
pub struct AirVp {
    name: String,
    vp_start: f64,
    steady_state: bool,
    input: Option<Input>,
    vp: f64,
    port: PortId,
}

impl AirVp {
    pub fn new(
        name: impl Into<String>,
        config: &AirVpConfig,
        net: &mut ConnectionGraph,
    ) -> ComponentResult<Self> {
        let name = name.into();
        require_non_negative(config.vp_start, "vp_start must be >= 0")?;
        if let Some(input) = &config.input {
            input.validate()?;
        }
        let port = net.add_port(
            qualified(&name, "port"),
            PortDomain::VaporPressure,
            config.vp_start,
        );
        Ok(Self {
            name,
            vp_start: config.vp_start,
            steady_state: config.steady_state,
            input: config.input.clone(),
            vp: config.vp_start,
            port,
        })
    }

    /// Track `input` unless in steady-state mode.
    pub fn update(&mut self, input: f64) -> f64 {
        self.vp = if self.steady_state { self.vp_start } else { input };
        self.vp
    }

    pub fn vp(&self) -> f64 {
        self.vp
    }
}

impl Component for AirVp {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<(String, PortId)> {
        vec![("port".into(), self.port)]
    }

    fn publish(&mut self, net: &mut ConnectionGraph, clock: Clock) -> ComponentResult<()> {
        let driving = match &self.input {
            Some(input) => input.at(clock.t),
            None => self.vp,
        };
        let vp = self.update(driving);
        net.drive_potential(self.port, vp)?;
        Ok(())
    }

    fn contribute(&mut self, _net: &mut ConnectionGraph, _clock: Clock) -> ComponentResult<()> {
        Ok(())
    }

    fn outputs(&self) -> Outputs {
        Outputs::new().scalar("VP", self.vp)
    }
}
