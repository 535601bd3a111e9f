//! Free convection between canopy leaves and the surrounding air.

use gh_core::PortId;
use gh_core::units::{Area, HeatTransferCoeff, m2, w_per_m2_k};
use gh_network::{ConnectionGraph, PortDomain};
use gh_sim::{Clock, require_finite, require_non_negative};
use serde::{Deserialize, Serialize};

use crate::common::{DEFAULT_PORT_TEMPERATURE, qualified};
use crate::error::ComponentResult;
use crate::input::Input;
use crate::traits::{Component, Outputs};

fn default_u() -> f64 {
    5.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanopyConvectionConfig {
    /// Floor area (m²).
    pub area: f64,
    /// Heat transfer coefficient per leaf side (W/(m²·K)).
    #[serde(default = "default_u")]
    pub u: f64,
    /// Leaf area index.
    #[serde(default)]
    pub lai: Input,
}

/// `Q = A * 2 * LAI * U * (T_b - T_a)`, positive from `b` to `a`.
#[derive(Debug, Clone)]
pub struct CanopyFreeConvection {
    name: String,
    area: Area,
    u: HeatTransferCoeff,
    lai: Input,
    q_flow: f64,
    a: PortId,
    b: PortId,
}

impl CanopyFreeConvection {
    pub fn new(
        name: impl Into<String>,
        config: &CanopyConvectionConfig,
        net: &mut ConnectionGraph,
    ) -> ComponentResult<Self> {
        let name = name.into();
        require_non_negative(config.area, "area must be >= 0")?;
        require_finite(config.u, "u must be finite")?;
        config.lai.validate()?;
        let a = net.add_port(qualified(&name, "a"), PortDomain::Heat, DEFAULT_PORT_TEMPERATURE);
        let b = net.add_port(qualified(&name, "b"), PortDomain::Heat, DEFAULT_PORT_TEMPERATURE);
        Ok(Self {
            name,
            area: m2(config.area),
            u: w_per_m2_k(config.u),
            lai: config.lai.clone(),
            q_flow: 0.0,
            a,
            b,
        })
    }

    /// Leaf-to-air conductance `A * 2 * LAI * U` (W/K).
    pub fn conductance(&self, lai: f64) -> f64 {
        (self.area * self.u).value * 2.0 * lai
    }

    pub fn update(&mut self, lai: f64, t_a: f64, t_b: f64) -> f64 {
        self.q_flow = self.conductance(lai) * (t_b - t_a);
        self.q_flow
    }

    pub fn q_flow(&self) -> f64 {
        self.q_flow
    }
}

impl Component for CanopyFreeConvection {
    fn name(&self) -> &str {
        &self.name
    }

    fn ports(&self) -> Vec<(String, PortId)> {
        vec![("a".into(), self.a), ("b".into(), self.b)]
    }

    fn contribute(&mut self, net: &mut ConnectionGraph, clock: Clock) -> ComponentResult<()> {
        let t_a = net.potential(self.a)?;
        let t_b = net.potential(self.b)?;
        let q = self.update(self.lai.at(clock.t), t_a, t_b);
        net.submit_flow(self.b, q)?;
        net.submit_flow(self.a, -q)?;
        Ok(())
    }

    fn outputs(&self) -> Outputs {
        Outputs::new().scalar("Q_flow", self.q_flow)
    }

    fn couplings(&self) -> Vec<(PortId, PortId, f64)> {
        vec![(self.a, self.b, self.conductance(self.lai.peak()).abs())]
    }
}
