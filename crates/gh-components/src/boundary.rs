//! Boundary components: fixed heat flow and prescribed temperature.

use gh_core::PortId;
use gh_network::{ConnectionGraph, PortDomain};
use gh_sim::{Clock, require_finite};
use serde::{Deserialize, Serialize};

use crate::common::{DEFAULT_PORT_TEMPERATURE, qualified};
use crate::error::ComponentResult;
use crate::input::Input;
use crate::traits::{Component, Outputs};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedHeatFlowConfig {
    /// Heat flow injected into the connected network (W).
    pub q_flow: f64,
}

/// Injects a constant heat flow through `port`; a no-op while unconnected.
#[derive(Debug, Clone)]
pub struct FixedHeatFlow {
    name: String,
    q_flow: f64,
    port: PortId,
}

impl FixedHeatFlow {
    pub fn new(
        name: impl Into<String>,
        config: &FixedHeatFlowConfig,
        net: &mut ConnectionGraph,
    ) -> ComponentResult<Self> {
        let name = name.into();
        require_finite(config.q_flow, "q_flow must be finite")?;
        let port = net.add_port(qualified(&name, "port"), PortDomain::Heat, DEFAULT_PORT_TEMPERATURE);
        Ok(Self {
            name,
            q_flow: config.q_flow,
            port,
        })
    }
}

impl Component for FixedHeatFlow {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<(String, PortId)> {
        vec![("port".into(), self.port)]
    }

    fn contribute(&mut self, net: &mut ConnectionGraph, _clock: Clock) -> ComponentResult<()> {
        if net.is_connected(self.port) {
            net.submit_flow(self.port, -self.q_flow)?;
        }
        Ok(())
    }

    fn outputs(&self) -> Outputs {
        Outputs::new().scalar("Q_flow", self.q_flow)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescribedTemperatureConfig {
    /// Boundary temperature (K).
    pub temperature: Input,
}

/// Fixed-potential boundary (outside air, soil, heating water supply).
///
/// Drives its temperature onto `port` and absorbs whatever heat flow the
/// junction balance leaves for it.
#[derive(Debug, Clone)]
pub struct PrescribedTemperature {
    name: String,
    temperature: Input,
    t: f64,
    q_flow: f64,
    port: PortId,
}

impl PrescribedTemperature {
    pub fn new(
        name: impl Into<String>,
        config: &PrescribedTemperatureConfig,
        net: &mut ConnectionGraph,
    ) -> ComponentResult<Self> {
        let name = name.into();
        config.temperature.validate()?;
        let t = config.temperature.at(0.0);
        let port = net.add_port(qualified(&name, "port"), PortDomain::Heat, t);
        Ok(Self {
            name,
            temperature: config.temperature.clone(),
            t,
            q_flow: 0.0,
            port,
        })
    }

    /// Heat flow absorbed over the last step (W, positive into the boundary).
    pub fn q_flow(&self) -> f64 {
        self.q_flow
    }
}

impl Component for PrescribedTemperature {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<(String, PortId)> {
        vec![("port".into(), self.port)]
    }

    fn publish(&mut self, net: &mut ConnectionGraph, clock: Clock) -> ComponentResult<()> {
        self.t = self.temperature.at(clock.t);
        net.drive_potential(self.port, self.t)?;
        Ok(())
    }

    fn contribute(&mut self, _net: &mut ConnectionGraph, _clock: Clock) -> ComponentResult<()> {
        Ok(())
    }

    fn advance(&mut self, net: &ConnectionGraph, _clock: Clock) -> ComponentResult<()> {
        self.q_flow = if net.is_connected(self.port) {
            net.flow(self.port)?
        } else {
            0.0
        };
        Ok(())
    }

    fn outputs(&self) -> Outputs {
        Outputs::new()
            .scalar("T", self.t)
            .scalar("Q_flow", self.q_flow)
    }
}
