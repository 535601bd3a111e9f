//! Port wiring shared by segmented walls.
//!
//! Every node `i` exposes two heat ports, `ext[i]` and `int[i]`. Node
//! temperatures are driven onto both rows; resolved port flows (W into the
//! wall) are converted back into per-node area fluxes before integration.
//! A surface with zero area cannot take heat: any flow reaching it fails
//! the step.

use gh_core::PortId;
use gh_network::{ConnectionGraph, PortDomain};
use gh_sim::{Clock, SegmentConfig, SegmentStep, SegmentedElement};
use tracing::error;

use crate::common::{indexed, qualified};
use crate::error::{ComponentError, ComponentResult};
use crate::traits::{Outputs, ThermalNode};

#[derive(Debug, Clone)]
pub(crate) struct WallPorts {
    element: SegmentedElement,
    ext: Vec<PortId>,
    int: Vec<PortId>,
    last: Option<SegmentStep>,
}

impl WallPorts {
    pub(crate) fn new(
        name: &str,
        config: SegmentConfig,
        net: &mut ConnectionGraph,
    ) -> ComponentResult<Self> {
        let element = SegmentedElement::new(config)?;
        let temps = element.temperatures().to_vec();
        let mut add_row = |row: &str| -> Vec<PortId> {
            temps
                .iter()
                .enumerate()
                .map(|(i, &t)| net.add_port(qualified(name, &indexed(row, i)), PortDomain::Heat, t))
                .collect()
        };
        let ext = add_row("ext");
        let int = add_row("int");
        Ok(Self {
            element,
            ext,
            int,
            last: None,
        })
    }

    pub(crate) fn element(&self) -> &SegmentedElement {
        &self.element
    }

    pub(crate) fn ports(&self) -> Vec<(String, PortId)> {
        let ext = self
            .ext
            .iter()
            .enumerate()
            .map(|(i, &id)| (indexed("ext", i), id));
        let int = self
            .int
            .iter()
            .enumerate()
            .map(|(i, &id)| (indexed("int", i), id));
        ext.chain(int).collect()
    }

    /// Node behind `port`, if it belongs to this wall and is integrated.
    pub(crate) fn node_at(&self, port: PortId) -> Option<ThermalNode> {
        if self.element.steady_state() {
            return None;
        }
        let index = self
            .ext
            .iter()
            .position(|&id| id == port)
            .or_else(|| self.int.iter().position(|&id| id == port))?;
        let conductance = self.element.node_conductance(index).ok()?;
        Some(ThermalNode {
            index,
            capacitance: self.element.node_capacitance(),
            conductance,
        })
    }

    pub(crate) fn publish(&self, net: &mut ConnectionGraph) -> ComponentResult<()> {
        for (i, &t) in self.element.temperatures().iter().enumerate() {
            net.drive_potential(self.ext[i], t)?;
            net.drive_potential(self.int[i], t)?;
        }
        Ok(())
    }

    pub(crate) fn advance(
        &mut self,
        owner: &str,
        net: &ConnectionGraph,
        clock: Clock,
    ) -> ComponentResult<()> {
        let ext = fluxes(owner, net, &self.ext, self.element.area_ext_node())?;
        let int = fluxes(owner, net, &self.int, self.element.area_int_node())?;
        self.last = Some(self.element.step(&ext, &int, clock.dt)?);
        Ok(())
    }

    pub(crate) fn outputs(&self) -> Outputs {
        let (derivatives, q_ext, q_int) = match &self.last {
            Some(step) => (step.derivatives.clone(), step.q_ext, step.q_int),
            None => (vec![0.0; self.element.node_count()], 0.0, 0.0),
        };
        Outputs::new()
            .series("T", self.element.temperatures().to_vec())
            .series("dTdt", derivatives)
            .scalar("Q_ext", q_ext)
            .scalar("Q_int", q_int)
    }
}

fn fluxes(
    owner: &str,
    net: &ConnectionGraph,
    ports: &[PortId],
    area_node: f64,
) -> ComponentResult<Vec<f64>> {
    ports
        .iter()
        .map(|&id| {
            if !net.is_connected(id) {
                return Ok(0.0);
            }
            let flow = net.flow(id)?;
            if area_node > 0.0 {
                Ok(flow / area_node)
            } else if flow == 0.0 {
                Ok(0.0)
            } else {
                error!(component = owner, port = %id, flow, "heat flow into zero-area surface");
                Err(ComponentError::InvalidConfiguration {
                    what: "heat flow reached a surface with zero area",
                })
            }
        })
        .collect()
}
